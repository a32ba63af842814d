//! File encoders for flat patterns.

pub mod dxf;

pub use dxf::FlatPatternDxf;

//! Error types for fold specifications.

use thiserror::Error;

/// Errors raised while building, loading, or editing a [`FoldSpec`](crate::FoldSpec).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    /// Sheet width or length is non-positive or non-finite.
    #[error("invalid sheet {field}: {value} (must be a positive finite number of mm)")]
    InvalidDimension {
        /// Which dimension was rejected (`"width"` or `"length"`).
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A snapshot record carries both a `position` and endpoints.
    #[error("fold line {0} has both a position and start/end points")]
    AmbiguousGeometry(String),

    /// A snapshot record carries neither a `position` nor both endpoints.
    #[error("fold line {0} has neither a position nor both start/end points")]
    MissingGeometry(String),

    /// Full-width and segment fold lines were combined in one design.
    #[error("a design cannot mix full-width and segment fold lines")]
    MixedGeometry,

    /// Two fold lines share an id.
    #[error("duplicate fold line id {0}")]
    DuplicateId(String),
}

/// Result type for fold specification operations.
pub type Result<T> = std::result::Result<T, IrError>;

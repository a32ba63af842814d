//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [fold]
//! angle_degrees = 30.0
//!
//! [flat_pattern]
//! tick_length = 10.0
//!
//! [dxf]
//! precision = 6
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CreaseError, FlatPatternOptions, FoldParams, Result};

/// Largest number of decimal places accepted for DXF coordinates.
pub const MAX_DXF_PRECISION: usize = 12;

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Segment building.
    pub fold: FoldSection,
    /// Flat-pattern emission.
    pub flat_pattern: FlatPatternSection,
    /// DXF encoding.
    pub dxf: DxfSection,
}

/// `[fold]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldSection {
    /// Visual fold angle per crease, in degrees.
    pub angle_degrees: f64,
}

impl Default for FoldSection {
    fn default() -> Self {
        Self {
            angle_degrees: FoldParams::CANVAS.fold_angle.to_degrees(),
        }
    }
}

/// `[flat_pattern]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatPatternSection {
    /// Direction tick length (mm).
    pub tick_length: f64,
}

impl Default for FlatPatternSection {
    fn default() -> Self {
        Self {
            tick_length: FlatPatternOptions::default().tick_length,
        }
    }
}

/// `[dxf]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DxfSection {
    /// Decimal places written for coordinates.
    pub precision: usize,
}

impl Default for DxfSection {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let angle = self.fold.angle_degrees;
        if !angle.is_finite() || angle <= 0.0 {
            return Err(CreaseError::Config(
                "fold.angle_degrees must be positive".into(),
            ));
        }
        let tick = self.flat_pattern.tick_length;
        if !tick.is_finite() || tick <= 0.0 {
            return Err(CreaseError::Config(
                "flat_pattern.tick_length must be positive".into(),
            ));
        }
        if self.dxf.precision > MAX_DXF_PRECISION {
            return Err(CreaseError::Config(format!(
                "dxf.precision must be at most {MAX_DXF_PRECISION}"
            )));
        }
        Ok(())
    }

    /// Segment builder parameters.
    pub fn fold_params(&self) -> FoldParams {
        FoldParams::from_degrees(self.fold.angle_degrees)
    }

    /// Flat-pattern emitter options.
    pub fn flat_pattern_options(&self) -> FlatPatternOptions {
        FlatPatternOptions {
            tick_length: self.flat_pattern.tick_length,
        }
    }
}

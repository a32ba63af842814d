#![warn(missing_docs)]

//! crease: fold a flat sheet along crease lines.
//!
//! A [`Design`] pairs a [`FoldSpec`] with an [`EngineConfig`] and exposes the
//! whole pipeline: folded 3D segments, an isometric screen projection, the
//! flat-pattern entity list and its DXF encoding.
//!
//! # Example
//!
//! ```rust,no_run
//! use crease::{Design, FoldSpec};
//!
//! let mut spec = FoldSpec::default();
//! spec.add_fold_line().unwrap();
//!
//! let design = Design::new(spec);
//! assert_eq!(design.segments().len(), 2);
//! design.export_dxf("bracket.dxf").unwrap();
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

pub mod config;
pub mod export;
pub mod store;

pub use config::EngineConfig;
pub use crease_ir::{
    snap_to_edge, Endpoint, FoldDirection, FoldGeometry, FoldKind, FoldLine, FoldLineId, FoldSpec,
    IrError, Point2D, Sheet, SheetEdge,
};
pub use crease_kernel_drafting::{
    DrawEntity, EntityKind, FlatPatternOptions, ProjectedPolygon, ProjectedView, ViewState,
};
pub use crease_kernel_fold::{Bounds3, FoldParams, Segment};
pub use crease_math as math;
pub use export::FlatPatternDxf;
pub use store::{DesignStore, DesignSummary, DirStore, MemoryStore};

/// Errors returned by the crease facade.
#[derive(Error, Debug)]
pub enum CreaseError {
    /// An I/O error occurred while reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A design snapshot could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// An edit was rejected by the fold spec.
    #[error(transparent)]
    Ir(#[from] IrError),
    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    Config(String),
    /// A configuration file is not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// No design with this id exists in the store.
    #[error("unknown design: {0}")]
    UnknownDesign(String),
    /// A design id cannot be used as a store key.
    #[error("invalid design id {0:?}: use letters, digits, '-' or '_'")]
    InvalidDesignId(String),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, CreaseError>;

/// A fold spec plus the engine settings used to render it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Design {
    spec: FoldSpec,
    config: EngineConfig,
}

impl Design {
    /// A design rendered with the default configuration.
    pub fn new(spec: FoldSpec) -> Self {
        Self::with_config(spec, EngineConfig::default())
    }

    /// A design rendered with `config`.
    pub fn with_config(spec: FoldSpec, config: EngineConfig) -> Self {
        Self { spec, config }
    }

    /// Read a JSON snapshot from disk.
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        Ok(Self::with_config(load_spec(path)?, config))
    }

    /// The underlying fold spec.
    pub fn spec(&self) -> &FoldSpec {
        &self.spec
    }

    /// Mutable access for editing operations.
    pub fn spec_mut(&mut self) -> &mut FoldSpec {
        &mut self.spec
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consume the design, keeping the spec.
    pub fn into_spec(self) -> FoldSpec {
        self.spec
    }

    /// Folded segments under the configured fold angle.
    pub fn segments(&self) -> Vec<Segment> {
        let params = self.config.fold_params();
        let segments = crease_kernel_fold::build_segments(&self.spec, &params);
        debug!(
            segments = segments.len(),
            fold_angle = params.fold_angle,
            "rebuilt segments"
        );
        segments
    }

    /// Screen-space projection of the folded sheet.
    ///
    /// The view's zoom is applied on top of the auto-fit scale, so zoom 1
    /// fits the sheet's larger side to roughly
    /// [`FIT_TARGET`](crease_kernel_drafting::FIT_TARGET) pixels.
    pub fn project(&self, view: &ViewState, center: Point2D) -> ProjectedView {
        let fit = crease_kernel_drafting::fit_scale(
            self.spec.sheet(),
            self.spec.fold_lines().len(),
            crease_kernel_drafting::FIT_TARGET,
        );
        let scaled = ViewState {
            zoom: view.zoom * fit,
            ..*view
        };
        crease_kernel_drafting::project_segments(&self.segments(), &scaled, center)
    }

    /// Flat-pattern entities in emission order.
    pub fn flat_pattern(&self) -> Vec<DrawEntity> {
        crease_kernel_drafting::emit_flat_pattern(&self.spec, &self.config.flat_pattern_options())
    }

    /// DXF writer for the flat pattern.
    pub fn to_dxf(&self) -> FlatPatternDxf {
        FlatPatternDxf::new(self.flat_pattern()).with_precision(self.config.dxf.precision)
    }

    /// The flat pattern as DXF text.
    pub fn to_dxf_string(&self) -> String {
        self.to_dxf().to_string()
    }

    /// Write the flat pattern as a DXF file.
    pub fn export_dxf(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_dxf().export(path)?;
        info!(path = %path.display(), name = %self.spec.name, "exported flat pattern DXF");
        Ok(())
    }
}

/// Read a fold spec snapshot from a JSON file.
pub fn load_spec(path: impl AsRef<Path>) -> Result<FoldSpec> {
    let json = fs::read_to_string(path)?;
    Ok(FoldSpec::from_json(&json)?)
}

/// Write a fold spec snapshot as pretty JSON.
pub fn save_spec(spec: &FoldSpec, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, spec.to_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_design_uses_configured_angle() {
        let mut spec = FoldSpec::default();
        spec.add_fold_line().unwrap();

        let canvas = Design::new(spec.clone());
        let preview = Design::with_config(
            spec,
            EngineConfig::from_toml_str("[fold]\nangle_degrees = 45.0\n").unwrap(),
        );
        let a = canvas.segments()[1].cumulative_angle;
        let b = preview.segments()[1].cumulative_angle;
        assert_relative_eq!(a, 30f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(b, 45f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_project_applies_fit_scale() {
        let design = Design::default();
        let view = design.project(&ViewState::default(), Point2D::ORIGIN);
        // 300 mm wide at 0.4 px/mm, flat, spans 300·cos30°·0.4 across
        let expected = 300.0 * (30f64.to_radians()).cos() * 0.4;
        assert_relative_eq!(view.bounds.width(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_ir_errors_convert() {
        let mut design = Design::default();
        let err: CreaseError = design.spec_mut().set_width(-1.0).unwrap_err().into();
        assert!(matches!(err, CreaseError::Ir(IrError::InvalidDimension { .. })));
    }

    #[test]
    fn test_spec_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.json");
        let mut spec = FoldSpec::default();
        spec.add_fold_line().unwrap();
        save_spec(&spec, &path).unwrap();
        assert_eq!(load_spec(&path).unwrap(), spec);
        assert!(matches!(
            load_spec(dir.path().join("missing.json")),
            Err(CreaseError::Io(_))
        ));
    }
}

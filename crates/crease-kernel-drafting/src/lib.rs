#![warn(missing_docs)]

//! 2D output for folded sheets.
//!
//! - **Isometric projection**: folded segments mapped to screen space under
//!   a yaw, zoom and pan view state.
//! - **Flat pattern**: the unfolded sheet as outline, crease and tick
//!   entities for drawing writers.
//!
//! # Example
//!
//! ```
//! use crease_ir::FoldSpec;
//! use crease_kernel_drafting::{emit_flat_pattern, project_segments, FlatPatternOptions, Point2D, ViewState};
//! use crease_kernel_fold::{build_segments, FoldParams};
//!
//! let mut spec = FoldSpec::default();
//! spec.add_fold_line().unwrap();
//!
//! let segments = build_segments(&spec, &FoldParams::CANVAS);
//! let view = project_segments(&segments, &ViewState::default(), Point2D::new(200.0, 150.0));
//! assert_eq!(view.polygons.len(), 2);
//!
//! let entities = emit_flat_pattern(&spec, &FlatPatternOptions::default());
//! assert_eq!(entities.len(), 3);
//! ```

pub mod flat_pattern;
pub mod projection;
pub mod types;

pub use flat_pattern::emit_flat_pattern;
pub use projection::{
    fit_scale, project, project_segments, project_with_depth, rotate_y, to_screen, FIT_TARGET,
};
pub use types::{
    BoundingBox2D, DrawEntity, EntityKind, FlatPatternOptions, Point2D, ProjectedPolygon,
    ProjectedView, ViewState, AUTO_ROTATE_STEP, FOLD_LAYER, MAX_ZOOM, MIN_ZOOM, OUTLINE_LAYER,
    TICK_LAYER, ZOOM_STEP,
};

//! Core types for projected views and flat-pattern drawings.

use serde::{Deserialize, Serialize};

pub use crease_ir::Point2D;

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// View state
// =============================================================================

/// Smallest zoom factor the view controller allows.
pub const MIN_ZOOM: f64 = 0.3;

/// Largest zoom factor the view controller allows.
pub const MAX_ZOOM: f64 = 3.0;

/// Zoom change per button press.
pub const ZOOM_STEP: f64 = 0.2;

/// Yaw advanced per animation frame while auto-rotating (radians).
pub const AUTO_ROTATE_STEP: f64 = 0.01;

/// Camera state supplied by the UI controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Yaw about the vertical axis (radians).
    pub rotation_y: f64,
    /// Uniform zoom factor (> 0).
    pub zoom: f64,
    /// Pixel pan offset.
    pub pan_offset: Point2D,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation_y: 0.0,
            zoom: 1.0,
            pan_offset: Point2D::ORIGIN,
        }
    }
}

impl ViewState {
    /// Zoom by `delta`, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_by(self, delta: f64) -> Self {
        Self {
            zoom: (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM),
            ..self
        }
    }

    /// Shift the pan offset by `(dx, dy)` pixels.
    pub fn panned(self, dx: f64, dy: f64) -> Self {
        Self {
            pan_offset: Point2D::new(self.pan_offset.x + dx, self.pan_offset.y + dy),
            ..self
        }
    }

    /// Advance the yaw by `step` radians.
    pub fn rotated(self, step: f64) -> Self {
        Self {
            rotation_y: self.rotation_y + step,
            ..self
        }
    }

    /// Back to the default camera.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Projected output
// =============================================================================

/// One segment outline mapped to screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPolygon {
    /// Index of the source segment.
    pub segment: usize,
    /// Screen-space vertices in outline order.
    pub points: Vec<Point2D>,
    /// Mean distance from the viewer; larger is farther.
    pub depth: f64,
    /// Display color `(hue°, saturation%, lightness%)`.
    pub hsl: (f64, f64, f64),
}

/// All projected segments plus their 2D bounds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectedView {
    /// Polygons in segment order.
    pub polygons: Vec<ProjectedPolygon>,
    /// Bounds of every projected vertex.
    pub bounds: BoundingBox2D,
}

impl ProjectedView {
    /// Add a polygon and update the bounding box.
    pub fn add_polygon(&mut self, polygon: ProjectedPolygon) {
        for p in &polygon.points {
            self.bounds.include_point(*p);
        }
        self.polygons.push(polygon);
    }

    /// Polygons ordered farthest first, for painter's-algorithm fills.
    pub fn back_to_front(&self) -> Vec<&ProjectedPolygon> {
        let mut sorted: Vec<_> = self.polygons.iter().collect();
        sorted.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        sorted
    }
}

// =============================================================================
// Flat pattern
// =============================================================================

/// Layer for the sheet outline.
pub const OUTLINE_LAYER: u32 = 0;

/// Layer for fold lines.
pub const FOLD_LAYER: u32 = 1;

/// Layer for direction ticks.
pub const TICK_LAYER: u32 = 2;

/// What a flat-pattern entity depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Closed sheet boundary.
    Outline,
    /// A crease.
    Fold,
    /// Short mark whose side encodes the fold direction.
    Tick,
}

impl EntityKind {
    /// Drawing layer this kind is placed on.
    pub fn layer(self) -> u32 {
        match self {
            EntityKind::Outline => OUTLINE_LAYER,
            EntityKind::Fold => FOLD_LAYER,
            EntityKind::Tick => TICK_LAYER,
        }
    }
}

/// A drawable flat-pattern entity in sheet millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEntity {
    /// Entity kind.
    pub kind: EntityKind,
    /// Polyline vertices; the outline repeats its first point at the end.
    pub points: Vec<Point2D>,
    /// Drawing layer.
    pub layer: u32,
}

impl DrawEntity {
    /// Entity of `kind` on that kind's layer.
    pub fn new(kind: EntityKind, points: Vec<Point2D>) -> Self {
        Self {
            kind,
            points,
            layer: kind.layer(),
        }
    }
}

/// Flat-pattern emission settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatPatternOptions {
    /// Tick mark length (mm).
    pub tick_length: f64,
}

impl Default for FlatPatternOptions {
    fn default() -> Self {
        Self { tick_length: 10.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut bbox = BoundingBox2D::empty();
        assert!(!bbox.is_valid());

        bbox.include_point(Point2D::new(-2.0, 1.0));
        bbox.include_point(Point2D::new(4.0, 3.0));
        assert!(bbox.is_valid());
        assert_eq!(bbox.width(), 6.0);
        assert_eq!(bbox.height(), 2.0);
        assert_eq!(bbox.center(), Point2D::new(1.0, 2.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ViewState::default();
        for _ in 0..20 {
            view = view.zoom_by(ZOOM_STEP);
        }
        assert_eq!(view.zoom, MAX_ZOOM);
        for _ in 0..20 {
            view = view.zoom_by(-ZOOM_STEP);
        }
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_pan_rotate_reset() {
        let mut view = ViewState::default()
            .panned(10.0, -5.0)
            .panned(1.0, 1.0)
            .rotated(AUTO_ROTATE_STEP);
        assert_eq!(view.pan_offset, Point2D::new(11.0, -4.0));
        assert_eq!(view.rotation_y, AUTO_ROTATE_STEP);
        view.reset();
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn test_view_state_json_keys() {
        let json = serde_json::to_string(&ViewState::default()).unwrap();
        assert!(json.contains("\"rotationY\""));
        assert!(json.contains("\"panOffset\""));
    }

    #[test]
    fn test_entity_layers_and_json() {
        let e = DrawEntity::new(EntityKind::Tick, vec![Point2D::ORIGIN]);
        assert_eq!(e.layer, 2);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"kind\":\"tick\""));
        assert_eq!(EntityKind::Outline.layer(), 0);
        assert_eq!(EntityKind::Fold.layer(), 1);
    }
}

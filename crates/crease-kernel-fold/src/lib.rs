#![warn(missing_docs)]

//! Segment decomposition for folded sheets.
//!
//! Turns a [`FoldSpec`] into planar [`Segment`]s, each carrying a rigid
//! transform from the flat sheet frame into the folded 3D frame. Two
//! builders exist, one per fold-line shape:
//!
//! - [`build_full_width`]: parallel creases across the width, folded about
//!   the X axis in order of position.
//! - [`build_oblique`]: arbitrary creases, each splitting the pieces it
//!   crosses and swinging the positive side about the crease.
//!
//! # Example
//!
//! ```
//! use crease_ir::FoldSpec;
//! use crease_kernel_fold::{build_segments, FoldParams};
//!
//! let mut spec = FoldSpec::default();
//! spec.add_fold_line().unwrap();
//!
//! let segments = build_segments(&spec, &FoldParams::CANVAS);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].span(), 100.0);
//! ```

mod full_width;
mod oblique;
pub mod polygon;

pub use full_width::build_full_width;
pub use oblique::build_oblique;

use crease_ir::{FoldKind, FoldSpec};
use crease_math::{Point2, Point3, Transform};

/// Parameters shared by both builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldParams {
    /// Visual fold angle in radians, applied per crease with the crease's
    /// direction sign. Not a physical bend angle.
    pub fold_angle: f64,
}

impl FoldParams {
    /// 30°, used by the interactive canvas.
    pub const CANVAS: Self = Self {
        fold_angle: std::f64::consts::FRAC_PI_6,
    };

    /// 45°, used by the standalone preview.
    pub const PREVIEW: Self = Self {
        fold_angle: std::f64::consts::FRAC_PI_4,
    };

    /// Parameters with the fold angle given in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            fold_angle: degrees.to_radians(),
        }
    }
}

impl Default for FoldParams {
    fn default() -> Self {
        Self::CANVAS
    }
}

/// A rigid planar piece of the folded sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position in the builder's output order.
    pub index: usize,
    /// Polygon in the flat sheet frame (counter-clockwise, not closed).
    pub outline: Vec<Point2>,
    /// Flat frame to folded 3D frame.
    pub transform: Transform,
    /// Sum of signed fold angles applied to this piece (radians).
    pub cumulative_angle: f64,
}

impl Segment {
    /// Extent of the flat outline along the length (y) axis.
    pub fn span(&self) -> f64 {
        let (min, max) = self
            .outline
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        if min.is_finite() {
            max - min
        } else {
            0.0
        }
    }

    /// Outline vertices placed in the folded 3D frame.
    pub fn vertices_3d(&self) -> Vec<Point3> {
        self.outline
            .iter()
            .map(|p| self.transform.apply_flat(p))
            .collect()
    }

    /// Debug display color as `(hue°, saturation%, lightness%)`.
    pub fn display_hsl(&self) -> (f64, f64, f64) {
        let i = self.index as f64;
        ((210.0 + 20.0 * i) % 360.0, 70.0, (60.0 + 5.0 * i).min(95.0))
    }
}

/// Build the segments of a fold spec.
///
/// Dispatches on the spec's fold-line shape; a spec with no fold lines
/// yields the whole sheet as one segment.
pub fn build_segments(spec: &FoldSpec, params: &FoldParams) -> Vec<Segment> {
    match spec.kind() {
        Some(FoldKind::Segment) => build_oblique(spec.sheet(), spec.fold_lines(), params),
        Some(FoldKind::FullWidth) | None => {
            build_full_width(spec.sheet(), spec.fold_lines(), params)
        }
    }
}

// =============================================================================
// Bounds
// =============================================================================

/// Axis-aligned box in the folded 3D frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Bounds3 {
    /// Box center.
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Largest side length.
    pub fn max_extent(&self) -> f64 {
        let d = self.max - self.min;
        d.x.max(d.y).max(d.z)
    }
}

/// Bounds of every folded vertex, or `None` if there are no vertices.
pub fn segment_bounds(segments: &[Segment]) -> Option<Bounds3> {
    let mut points = segments.iter().flat_map(Segment::vertices_3d);
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(lo, hi), p| {
        (
            Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        )
    });
    Some(Bounds3 { min, max })
}

pub(crate) fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crease_ir::{FoldDirection, Point2D};

    #[test]
    fn test_empty_spec_is_one_flat_segment() {
        let segments = build_segments(&FoldSpec::default(), &FoldParams::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].span(), 200.0);
        assert_eq!(segments[0].transform, Transform::identity());
    }

    #[test]
    fn test_dispatch_on_segment_kind() {
        let mut spec = FoldSpec::default();
        spec.add_segment_fold(
            Point2D::new(0.0, 100.0),
            Point2D::new(300.0, 100.0),
            FoldDirection::Up,
        )
        .unwrap();
        let segments = build_segments(&spec, &FoldParams::CANVAS);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().any(|s| s.cumulative_angle != 0.0));
    }

    #[test]
    fn test_display_palette() {
        let seg = |index| Segment {
            index,
            outline: Vec::new(),
            transform: Transform::identity(),
            cumulative_angle: 0.0,
        };
        assert_eq!(seg(0).display_hsl(), (210.0, 70.0, 60.0));
        assert_eq!(seg(2).display_hsl(), (250.0, 70.0, 70.0));
        assert_eq!(seg(9).display_hsl().0, 30.0);
        assert_eq!(seg(20).display_hsl().2, 95.0);
    }

    #[test]
    fn test_bounds_of_flat_sheet() {
        let segments = build_segments(&FoldSpec::default(), &FoldParams::default());
        let b = segment_bounds(&segments).unwrap();
        assert_relative_eq!(b.max_extent(), 300.0);
        assert_relative_eq!(b.center().x, 150.0);
        assert_relative_eq!(b.center().y, 100.0);
        assert!(segment_bounds(&[]).is_none());
    }

    #[test]
    fn test_preview_angle() {
        assert_relative_eq!(FoldParams::PREVIEW.fold_angle, 45f64.to_radians());
        assert_relative_eq!(
            FoldParams::from_degrees(30.0).fold_angle,
            FoldParams::CANVAS.fold_angle
        );
    }
}

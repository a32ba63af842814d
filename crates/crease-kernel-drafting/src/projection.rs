//! Isometric projection of folded segments.
//!
//! A point is first yawed about the vertical (Y) axis, then collapsed with a
//! 30° isometric shear:
//!
//! ```text
//! x' = x·cosθ − z·sinθ        isoX = (x' − z')·cos30°
//! z' = x·sinθ + z·cosθ        isoY = y + (x' + z')·sin30°
//! ```
//!
//! Screen mapping scales by zoom, adds the pixel pan, and flips Y so model
//! up is screen up.

use crease_ir::Sheet;
use crease_kernel_fold::{segment_bounds, Segment};
use crease_math::{Point3, Transform};
use tracing::debug;

use crate::types::{Point2D, ProjectedPolygon, ProjectedView, ViewState};

/// Target on-screen size (px) of the larger sheet dimension at zoom 1.
pub const FIT_TARGET: f64 = 120.0;

/// Isometric shear angle.
const ISO_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

/// Yaw `point` about the Y axis by `angle` radians.
pub fn rotate_y(point: &Point3, angle: f64) -> Point3 {
    // positive yaw turns +X toward +Z
    Transform::rotation_y(-angle).apply_point(point)
}

/// Project a 3D point to isometric 2D after yawing by `rotation_y`.
pub fn project(point: &Point3, rotation_y: f64) -> Point2D {
    project_with_depth(point, rotation_y).0
}

/// Like [`project`], also returning the distance from the viewer.
///
/// The collapsed direction is `(1, −1, 1)` in the yawed frame; the viewer
/// sits on its positive side, so depth grows away from it.
pub fn project_with_depth(point: &Point3, rotation_y: f64) -> (Point2D, f64) {
    let r = rotate_y(point, rotation_y);
    let iso = Point2D::new(
        (r.x - r.z) * ISO_ANGLE.cos(),
        r.y + (r.x + r.z) * ISO_ANGLE.sin(),
    );
    let depth = -(r.x - r.y + r.z) / 3f64.sqrt();
    (iso, depth)
}

/// Map an isometric point to device pixels around `center`.
pub fn to_screen(point: Point2D, zoom: f64, pan: Point2D, center: Point2D) -> Point2D {
    Point2D::new(
        center.x + point.x * zoom + pan.x,
        center.y - point.y * zoom + pan.y,
    )
}

/// Auto-fit scale for a sheet: the larger dimension maps to `target`
/// pixels, shrunk by 10% per fold down to a floor of 30%.
pub fn fit_scale(sheet: &Sheet, fold_count: usize, target: f64) -> f64 {
    let max_dim = sheet.width.max(sheet.length);
    let shrink = (1.0 - 0.1 * fold_count as f64).max(0.3);
    target / max_dim * shrink
}

/// Project every segment outline for display.
///
/// The folded model is re-centered on its 3D bounding-box center before
/// projection, so `center` is where the model's middle lands on screen.
pub fn project_segments(segments: &[Segment], view: &ViewState, center: Point2D) -> ProjectedView {
    let origin = segment_bounds(segments)
        .map(|b| b.center())
        .unwrap_or_else(Point3::origin);

    let mut out = ProjectedView::default();
    for seg in segments {
        let mut depth_sum = 0.0;
        let points: Vec<Point2D> = seg
            .vertices_3d()
            .iter()
            .map(|v| {
                let local = Point3::from(v - origin);
                let (iso, depth) = project_with_depth(&local, view.rotation_y);
                depth_sum += depth;
                to_screen(iso, view.zoom, view.pan_offset, center)
            })
            .collect();
        let depth = if points.is_empty() {
            0.0
        } else {
            depth_sum / points.len() as f64
        };
        out.add_polygon(ProjectedPolygon {
            segment: seg.index,
            points,
            depth,
            hsl: seg.display_hsl(),
        });
    }

    debug!(
        polygons = out.polygons.len(),
        rotation_y = view.rotation_y,
        zoom = view.zoom,
        "projected segments"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crease_ir::FoldSpec;
    use crease_kernel_fold::{build_segments, FoldParams};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_y_quarter_turn() {
        let p = rotate_y(&Point3::new(1.0, 2.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_isometric_axes() {
        let c30 = ISO_ANGLE.cos();
        let x = project(&Point3::new(1.0, 0.0, 0.0), 0.0);
        assert_relative_eq!(x.x, c30);
        assert_relative_eq!(x.y, 0.5, epsilon = 1e-12);

        let y = project(&Point3::new(0.0, 1.0, 0.0), 0.0);
        assert_eq!(y, Point2D::new(0.0, 1.0));

        let z = project(&Point3::new(0.0, 0.0, 1.0), 0.0);
        assert_relative_eq!(z.x, -c30);
        assert_relative_eq!(z.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_collapsed_direction_differs_only_in_depth() {
        let (a, da) = project_with_depth(&Point3::new(0.0, 0.0, 0.0), 0.0);
        let (b, db) = project_with_depth(&Point3::new(1.0, -1.0, 1.0), 0.0);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert!(db < da);
    }

    #[test]
    fn test_to_screen_flips_y() {
        let s = to_screen(
            Point2D::new(10.0, 10.0),
            2.0,
            Point2D::new(5.0, 0.0),
            Point2D::new(200.0, 150.0),
        );
        assert_eq!(s, Point2D::new(225.0, 130.0));
    }

    #[test]
    fn test_fit_scale() {
        let sheet = Sheet::default();
        assert_relative_eq!(fit_scale(&sheet, 0, FIT_TARGET), 0.4, epsilon = 1e-12);
        assert_relative_eq!(fit_scale(&sheet, 2, FIT_TARGET), 0.32, epsilon = 1e-12);
        assert_relative_eq!(fit_scale(&sheet, 50, FIT_TARGET), 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_sheet_centers_on_screen() {
        let segments = build_segments(&FoldSpec::default(), &FoldParams::CANVAS);
        let center = Point2D::new(400.0, 300.0);
        let view = project_segments(&segments, &ViewState::default(), center);

        assert_eq!(view.polygons.len(), 1);
        assert_eq!(view.polygons[0].points.len(), 4);
        let c = view.bounds.center();
        assert_relative_eq!(c.x, center.x, epsilon = 1e-9);
        assert_relative_eq!(c.y, center.y, epsilon = 1e-9);
    }

    #[test]
    fn test_back_to_front_order() {
        let mut spec = FoldSpec::default();
        spec.add_fold_line().unwrap();
        let segments = build_segments(&spec, &FoldParams::PREVIEW);
        let view = project_segments(&segments, &ViewState::default(), Point2D::ORIGIN);

        let ordered = view.back_to_front();
        assert_eq!(ordered.len(), 2);
        assert!(ordered[0].depth >= ordered[1].depth);
    }

    proptest! {
        #[test]
        fn prop_rotation_inverse_restores_point(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            z in -1000.0f64..1000.0,
            theta in -10.0f64..10.0,
        ) {
            let p = Point3::new(x, y, z);
            let back = rotate_y(&rotate_y(&p, theta), -theta);
            prop_assert!((back - p).norm() < 1e-9);

            let flat = project(&p, 0.0);
            let round_trip = project(&rotate_y(&p, theta), -theta);
            prop_assert!((flat.x - round_trip.x).abs() < 1e-9);
            prop_assert!((flat.y - round_trip.y).abs() < 1e-9);
        }
    }
}

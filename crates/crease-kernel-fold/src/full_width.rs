//! Full-width folds: parallel creases across the sheet width.
//!
//! The sheet is cut at every crease position into strips along the length
//! axis. Walking the strips in position order, each strip is rotated about
//! the X axis by the angle accumulated from the creases before it, and
//! placed where the previous strip ended.

use crease_ir::{FoldGeometry, FoldLine, Sheet};
use crease_math::Transform;
use tracing::debug;

use crate::{rectangle, FoldParams, Segment};

/// Build strips for the full-width fold lines in `lines`.
///
/// Lines are sorted by position with a stable sort, so creases sharing a
/// position keep insertion order and produce zero-length strips. Segment
/// fold lines are ignored. Always returns `cuts + 1` segments.
pub fn build_full_width(sheet: &Sheet, lines: &[FoldLine], params: &FoldParams) -> Vec<Segment> {
    let mut cuts: Vec<(f64, f64)> = lines
        .iter()
        .filter_map(|line| match line.geometry {
            FoldGeometry::FullWidth { position } => {
                Some((sheet.clamp_position(position), line.direction.sign()))
            }
            FoldGeometry::Segment { .. } => None,
        })
        .collect();
    cuts.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let (mut y, mut z, mut theta, mut prev) = (0.0, 0.0, 0.0, 0.0);

    for &(position, sign) in &cuts {
        segments.push(strip(segments.len(), sheet, prev, position, y, z, theta));

        let len = position - prev;
        y += theta.cos() * len;
        z += theta.sin() * len;
        theta += sign * params.fold_angle;
        prev = position;
    }
    segments.push(strip(segments.len(), sheet, prev, sheet.length, y, z, theta));

    debug!(
        folds = cuts.len(),
        segments = segments.len(),
        "built full-width segments"
    );
    segments
}

/// Strip `from..to` whose near edge lands at `(0, y, z)` tilted by `theta`.
fn strip(index: usize, sheet: &Sheet, from: f64, to: f64, y: f64, z: f64, theta: f64) -> Segment {
    // flat edge at `from` -> origin, tilt, then move to the running position
    let transform = Transform::translation(0.0, y, z)
        .then(&Transform::rotation_x(theta))
        .then(&Transform::translation(0.0, -from, 0.0));
    Segment {
        index,
        outline: rectangle(0.0, from, sheet.width, to),
        transform,
        cumulative_angle: theta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crease_ir::{FoldDirection, FoldLineId, Point2D};
    use crease_math::{Point2, Point3};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_6;

    fn fold(id: &str, position: f64, direction: FoldDirection) -> FoldLine {
        FoldLine::full_width(FoldLineId::new(id), position, direction)
    }

    fn sheet() -> Sheet {
        Sheet::new(300.0, 200.0).unwrap()
    }

    #[test]
    fn test_single_up_fold_at_midpoint() {
        let lines = [fold("a", 100.0, FoldDirection::Up)];
        let segments = build_full_width(&sheet(), &lines, &FoldParams::CANVAS);

        assert_eq!(segments.len(), 2);
        assert_relative_eq!(segments[0].span(), 100.0);
        assert_relative_eq!(segments[1].span(), 100.0);
        assert_eq!(segments[0].transform, Transform::identity());
        assert_relative_eq!(segments[1].cumulative_angle, FRAC_PI_6);

        // crease stays put, far edge swings up
        let crease = segments[1].transform.apply_flat(&Point2::new(0.0, 100.0));
        assert!((crease - Point3::new(0.0, 100.0, 0.0)).norm() < 1e-9);
        let far = segments[1].transform.apply_flat(&Point2::new(300.0, 200.0));
        assert_relative_eq!(far.x, 300.0, epsilon = 1e-9);
        assert_relative_eq!(far.y, 100.0 + 100.0 * FRAC_PI_6.cos(), epsilon = 1e-9);
        assert_relative_eq!(far.z, 100.0 * FRAC_PI_6.sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_down_fold_goes_negative_z() {
        let lines = [fold("a", 50.0, FoldDirection::Down)];
        let segments = build_full_width(&sheet(), &lines, &FoldParams::PREVIEW);
        let far = segments[1].transform.apply_flat(&Point2::new(0.0, 200.0));
        assert!(far.z < 0.0);
        assert_relative_eq!(segments[1].cumulative_angle, -FoldParams::PREVIEW.fold_angle);
    }

    #[test]
    fn test_strips_are_sorted_and_connected() {
        let lines = [
            fold("c", 150.0, FoldDirection::Down),
            fold("a", 40.0, FoldDirection::Up),
            fold("b", 90.0, FoldDirection::Up),
        ];
        let segments = build_full_width(&sheet(), &lines, &FoldParams::CANVAS);
        assert_eq!(segments.len(), 4);

        let spans: Vec<f64> = segments.iter().map(Segment::span).collect();
        assert_eq!(spans, vec![40.0, 50.0, 60.0, 50.0]);

        // far edge of each strip meets the near edge of the next
        for pair in segments.windows(2) {
            let edge = pair[0].outline[2];
            let a = pair[0].transform.apply_flat(&edge);
            let b = pair[1].transform.apply_flat(&edge);
            assert!((a - b).norm() < 1e-9);
        }
        assert_relative_eq!(segments[3].cumulative_angle, FRAC_PI_6, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicate_positions_keep_zero_length_strip() {
        let lines = [
            fold("a", 80.0, FoldDirection::Up),
            fold("b", 80.0, FoldDirection::Up),
        ];
        let segments = build_full_width(&sheet(), &lines, &FoldParams::CANVAS);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].span(), 0.0);
        assert_relative_eq!(segments[2].cumulative_angle, 2.0 * FRAC_PI_6);
    }

    #[test]
    fn test_segment_lines_are_ignored() {
        let lines = [FoldLine::segment(
            FoldLineId::new("s"),
            Point2D::new(0.0, 0.0),
            Point2D::new(300.0, 200.0),
            FoldDirection::Up,
        )];
        let segments = build_full_width(&sheet(), &lines, &FoldParams::CANVAS);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_transforms_are_rigid() {
        let lines = [
            fold("a", 30.0, FoldDirection::Up),
            fold("b", 120.0, FoldDirection::Down),
        ];
        for seg in build_full_width(&sheet(), &lines, &FoldParams::CANVAS) {
            assert!(seg.transform.is_rigid(1e-9));
        }
    }

    proptest! {
        #[test]
        fn prop_n_folds_give_n_plus_one_strips_summing_to_length(
            positions in proptest::collection::vec(0.0f64..200.0, 0..12),
            ups in proptest::collection::vec(any::<bool>(), 12),
        ) {
            let lines: Vec<FoldLine> = positions
                .iter()
                .zip(&ups)
                .enumerate()
                .map(|(i, (&p, &up))| {
                    let dir = if up { FoldDirection::Up } else { FoldDirection::Down };
                    fold(&format!("f{i}"), p, dir)
                })
                .collect();
            let segments = build_full_width(&sheet(), &lines, &FoldParams::CANVAS);
            prop_assert_eq!(segments.len(), lines.len() + 1);
            let total: f64 = segments.iter().map(Segment::span).sum();
            prop_assert!((total - 200.0).abs() < 1e-9);
        }
    }
}

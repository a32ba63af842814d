//! Planar polygon helpers: signed area and half-plane splitting.

use crease_math::{Point2, Vec2};

/// Vertices closer than this to a split line count as lying on it (mm).
pub const ON_LINE_TOLERANCE: f64 = 1e-9;

/// A directed infinite line in the flat sheet frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLine {
    /// A point on the line.
    pub origin: Point2,
    /// Unit direction.
    pub direction: Vec2,
}

impl SplitLine {
    /// Line through `start` toward `end`. `None` if the points coincide.
    pub fn through(start: Point2, end: Point2) -> Option<Self> {
        let d = end - start;
        let len = d.norm();
        if len < ON_LINE_TOLERANCE {
            return None;
        }
        Some(Self {
            origin: start,
            direction: d / len,
        })
    }

    /// Signed perpendicular distance; positive to the left of the direction.
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        let v = p - self.origin;
        self.direction.x * v.y - self.direction.y * v.x
    }
}

/// Shoelace area; positive for counter-clockwise winding.
pub fn signed_area(polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

/// Split a convex polygon by a line into `(negative, positive)` parts.
///
/// Vertices on the line go to both parts. A part with fewer than three
/// vertices or no area comes back empty.
pub fn split_polygon(polygon: &[Point2], line: &SplitLine) -> (Vec<Point2>, Vec<Point2>) {
    let dist: Vec<f64> = polygon.iter().map(|p| line.signed_distance(p)).collect();
    (
        clip_half(polygon, &dist, -1.0),
        clip_half(polygon, &dist, 1.0),
    )
}

fn clip_half(polygon: &[Point2], dist: &[f64], side: f64) -> Vec<Point2> {
    let tol = ON_LINE_TOLERANCE;
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);

    for i in 0..n {
        let j = (i + 1) % n;
        let (dc, dn) = (side * dist[i], side * dist[j]);

        if dc >= -tol {
            out.push(polygon[i]);
        }
        // strict crossing only; on-line vertices are pushed on their own turn
        if (dc > tol && dn < -tol) || (dc < -tol && dn > tol) {
            let t = dc / (dc - dn);
            out.push(polygon[i] + (polygon[j] - polygon[i]) * t);
        }
    }

    if out.len() < 3 || signed_area(&out).abs() < tol {
        Vec::new()
    } else {
        out
    }
}

//! Edge snapping for dragged fold-line endpoints.
//!
//! A dragged endpoint is pinned to whichever sheet edge is nearest. The
//! "top" edge is `y = 0` and the "bottom" edge is `y = length`, matching
//! the 2D editor where sheet Y grows downward.

use crate::{Point2D, Sheet};

/// One of the four sheet boundary edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetEdge {
    /// `x = 0`.
    Left,
    /// `x = width`.
    Right,
    /// `y = 0`.
    Top,
    /// `y = length`.
    Bottom,
}

impl SheetEdge {
    /// Tie-break order when two edges are equally near. Earlier wins.
    pub const PRIORITY: [SheetEdge; 4] = [
        SheetEdge::Left,
        SheetEdge::Right,
        SheetEdge::Top,
        SheetEdge::Bottom,
    ];

    /// Perpendicular distance from `p` to the line carrying this edge.
    pub fn distance(self, p: Point2D, sheet: &Sheet) -> f64 {
        match self {
            SheetEdge::Left => p.x.abs(),
            SheetEdge::Right => (p.x - sheet.width).abs(),
            SheetEdge::Top => p.y.abs(),
            SheetEdge::Bottom => (p.y - sheet.length).abs(),
        }
    }
}

/// The edge nearest to `point`, ties resolved by [`SheetEdge::PRIORITY`].
pub fn nearest_edge(point: Point2D, sheet: &Sheet) -> SheetEdge {
    let point = finite_or_zero(point);
    let mut best = SheetEdge::PRIORITY[0];
    let mut best_dist = best.distance(point, sheet);
    for edge in &SheetEdge::PRIORITY[1..] {
        let d = edge.distance(point, sheet);
        // strict comparison keeps the earlier edge on ties
        if d < best_dist {
            best = *edge;
            best_dist = d;
        }
    }
    best
}

/// Pin `point` onto the nearest sheet edge.
///
/// The coordinate fixed by the edge is set exactly to `0`, `width` or
/// `length`. The free coordinate is rounded to whole millimeters and
/// clamped into the edge's extent; a value at or past the far corner is
/// pinned to it so corners survive on non-integer sheets. Non-finite
/// coordinates are treated as `0`.
pub fn snap_to_edge(point: Point2D, sheet: &Sheet) -> Point2D {
    let point = finite_or_zero(point);
    let along = |v: f64, max: f64| if v >= max { max } else { v.round().clamp(0.0, max) };
    let along_x = |x: f64| along(x, sheet.width);
    let along_y = |y: f64| along(y, sheet.length);

    match nearest_edge(point, sheet) {
        SheetEdge::Left => Point2D::new(0.0, along_y(point.y)),
        SheetEdge::Right => Point2D::new(sheet.width, along_y(point.y)),
        SheetEdge::Top => Point2D::new(along_x(point.x), 0.0),
        SheetEdge::Bottom => Point2D::new(along_x(point.x), sheet.length),
    }
}

fn finite_or_zero(p: Point2D) -> Point2D {
    let f = |v: f64| if v.is_finite() { v } else { 0.0 };
    Point2D::new(f(p.x), f(p.y))
}

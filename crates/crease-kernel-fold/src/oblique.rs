//! Oblique folds: creases between arbitrary points on the sheet.
//!
//! Every crease is applied to the whole working set of pieces. Each piece it
//! crosses is split in two; the part left of `start -> end` swings about
//! the crease by the signed fold angle, together with every piece lying
//! wholly on that side.

use crease_ir::{FoldGeometry, FoldLine, Sheet};
use crease_math::{Dir3, Transform, Vec3};
use tracing::debug;

use crate::polygon::{split_polygon, SplitLine, ON_LINE_TOLERANCE};
use crate::{rectangle, FoldParams, Segment};

#[derive(Debug, Clone)]
struct Piece {
    outline: Vec<crease_math::Point2>,
    transform: Transform,
    angle: f64,
}

/// Build pieces for the segment fold lines in `lines`, in input order.
///
/// Degenerate creases (coincident endpoints) are skipped. Full-width fold
/// lines are ignored. With nothing to apply the result is the flat sheet.
pub fn build_oblique(sheet: &Sheet, lines: &[FoldLine], params: &FoldParams) -> Vec<Segment> {
    let mut pieces = vec![Piece {
        outline: rectangle(0.0, 0.0, sheet.width, sheet.length),
        transform: Transform::identity(),
        angle: 0.0,
    }];
    let mut skipped = 0usize;

    for line in lines {
        let FoldGeometry::Segment { start, end } = line.geometry else {
            continue;
        };
        let Some(split) = SplitLine::through(start.into(), end.into()) else {
            skipped += 1;
            continue;
        };
        let angle = line.direction.sign() * params.fold_angle;
        pieces = apply_crease(pieces, &split, angle);
    }

    debug!(
        folds = lines.len(),
        skipped,
        segments = pieces.len(),
        "built oblique segments"
    );

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, p)| Segment {
            index,
            outline: p.outline,
            transform: p.transform,
            cumulative_angle: p.angle,
        })
        .collect()
}

fn apply_crease(pieces: Vec<Piece>, line: &SplitLine, angle: f64) -> Vec<Piece> {
    let halves: Vec<_> = pieces
        .into_iter()
        .map(|p| {
            let (neg, pos) = split_polygon(&p.outline, line);
            (p, neg, pos)
        })
        .collect();

    // the crease is placed in 3D by the first piece it cuts, else by the
    // first piece with an edge on it
    let host = halves
        .iter()
        .find(|(_, neg, pos)| !neg.is_empty() && !pos.is_empty())
        .or_else(|| halves.iter().find(|(p, _, _)| has_edge_on(&p.outline, line)))
        .map(|(p, _, _)| p.transform.clone())
        .unwrap_or_default();
    let swing = swing_about(&host, line, angle);

    let mut out = Vec::with_capacity(halves.len() + 1);
    for (piece, neg, pos) in halves {
        if !neg.is_empty() {
            out.push(Piece {
                outline: neg,
                transform: piece.transform.clone(),
                angle: piece.angle,
            });
        }
        if !pos.is_empty() {
            out.push(Piece {
                outline: pos,
                transform: swing.then(&piece.transform),
                angle: piece.angle + angle,
            });
        }
    }
    out
}

/// At least two vertices of `outline` lie on `line`.
fn has_edge_on(outline: &[crease_math::Point2], line: &SplitLine) -> bool {
    outline
        .iter()
        .filter(|p| line.signed_distance(p).abs() <= ON_LINE_TOLERANCE)
        .count()
        >= 2
}

/// Rotation about the crease as placed by `host`, in the folded frame.
fn swing_about(host: &Transform, line: &SplitLine, angle: f64) -> Transform {
    let origin = host.apply_flat(&line.origin);
    let axis = host.apply_vec(&Vec3::new(line.direction.x, line.direction.y, 0.0));
    Transform::rotation_about_line(&origin, &Dir3::new_normalize(axis), angle)
}

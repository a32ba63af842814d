//! Flat-pattern drawing entities.
//!
//! Output order is observable in written files: the outline first, then for
//! each fold line in spec order its crease followed by its tick.

use crease_ir::{FoldDirection, FoldLine, FoldSpec, Sheet};
use crease_math::Tolerance;
use tracing::debug;

use crate::types::{DrawEntity, EntityKind, FlatPatternOptions, Point2D};

/// Emit the flat-pattern entities for `spec`.
pub fn emit_flat_pattern(spec: &FoldSpec, options: &FlatPatternOptions) -> Vec<DrawEntity> {
    let sheet = spec.sheet();
    let mut entities = Vec::with_capacity(1 + 2 * spec.fold_lines().len());
    entities.push(outline(sheet));
    for line in spec.fold_lines() {
        let (start, end) = line.endpoints(sheet);
        entities.push(DrawEntity::new(EntityKind::Fold, vec![start, end]));
        entities.push(tick(line, sheet, options.tick_length));
    }
    debug!(
        entities = entities.len(),
        folds = spec.fold_lines().len(),
        "emitted flat pattern"
    );
    entities
}

/// Closed sheet rectangle, first point repeated.
fn outline(sheet: &Sheet) -> DrawEntity {
    let (w, l) = (sheet.width, sheet.length);
    DrawEntity::new(
        EntityKind::Outline,
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, l),
            Point2D::new(0.0, l),
            Point2D::new(0.0, 0.0),
        ],
    )
}

/// Tick from the crease midpoint along its left normal; `Up` points against it.
fn tick(line: &FoldLine, sheet: &Sheet, length: f64) -> DrawEntity {
    let (start, end) = line.endpoints(sheet);
    let mid = Point2D::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);

    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let norm = dx.hypot(dy);
    // degenerate creases have no direction; use +y
    let (nx, ny) = if Tolerance::DEFAULT.is_zero(norm) {
        (0.0, 1.0)
    } else {
        (-dy / norm, dx / norm)
    };
    let offset = match line.direction {
        FoldDirection::Up => -length,
        FoldDirection::Down => length,
    };

    DrawEntity::new(
        EntityKind::Tick,
        vec![mid, Point2D::new(mid.x + nx * offset, mid.y + ny * offset)],
    )
}

//! Editing operations on an owned [`FoldSpec`].
//!
//! Coordinates are clamped into the sheet instead of rejected, so a drag
//! that overshoots an edge pins to it. Updates that name an unknown id are
//! no-ops returning `false`; a UI may race a removal against an update.

use tracing::debug;

use crate::snap::snap_to_edge;
use crate::{
    validate_dimension, FoldDirection, FoldGeometry, FoldKind, FoldLine, FoldLineId, FoldSpec,
    IrError, Point2D, Result,
};

/// Which end of a segment fold is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` point.
    Start,
    /// The `end` point.
    End,
}

impl FoldSpec {
    /// Change both sheet dimensions.
    ///
    /// Rejects non-positive or non-finite values and keeps the prior sheet.
    /// Existing fold lines are not moved; call [`FoldSpec::reclamp`] afterwards
    /// if they should follow the new bounds.
    pub fn set_dimensions(&mut self, width: f64, length: f64) -> Result<()> {
        validate_dimension("width", width)?;
        validate_dimension("length", length)?;
        self.sheet.width = width;
        self.sheet.length = length;
        Ok(())
    }

    /// Change the sheet width only.
    pub fn set_width(&mut self, width: f64) -> Result<()> {
        self.set_dimensions(width, self.sheet.length)
    }

    /// Change the sheet length only.
    pub fn set_length(&mut self, length: f64) -> Result<()> {
        self.set_dimensions(self.sheet.width, length)
    }

    /// Clamp every fold line into the current sheet. Returns how many moved.
    pub fn reclamp(&mut self) -> usize {
        let sheet = self.sheet;
        self.fold_lines
            .iter_mut()
            .map(|line| line.clamp_into(&sheet))
            .filter(|moved| *moved)
            .count()
    }

    /// Append a full-width fold at the sheet's midpoint, bending up.
    ///
    /// The position is `round(length / 2)`.
    pub fn add_fold_line(&mut self) -> Result<FoldLineId> {
        self.ensure_kind(FoldKind::FullWidth)?;
        let id = self.fresh_id();
        let position = self.sheet.clamp_position((self.sheet.length / 2.0).round());
        self.fold_lines
            .push(FoldLine::full_width(id.clone(), position, FoldDirection::Up));
        debug!(%id, position, "added full-width fold line");
        Ok(id)
    }

    /// Append a segment fold between two points (clamped into the sheet).
    pub fn add_segment_fold(
        &mut self,
        start: Point2D,
        end: Point2D,
        direction: FoldDirection,
    ) -> Result<FoldLineId> {
        self.ensure_kind(FoldKind::Segment)?;
        let id = self.fresh_id();
        let start = self.sheet.clamp_point(start);
        let end = self.sheet.clamp_point(end);
        self.fold_lines
            .push(FoldLine::segment(id.clone(), start, end, direction));
        debug!(%id, ?start, ?end, "added segment fold line");
        Ok(id)
    }

    /// Remove a fold line. Returns `false` if the id is unknown.
    pub fn remove_fold_line(&mut self, id: &FoldLineId) -> bool {
        let before = self.fold_lines.len();
        self.fold_lines.retain(|l| &l.id != id);
        let removed = self.fold_lines.len() != before;
        if !removed {
            debug!(%id, "remove ignored: unknown fold line");
        }
        removed
    }

    /// Move a full-width fold. Out-of-range positions are clamped; a
    /// non-finite position keeps the prior value.
    pub fn set_position(&mut self, id: &FoldLineId, position: f64) -> bool {
        let sheet = self.sheet;
        let Some(line) = self.lookup_mut(id) else {
            return false;
        };
        match &mut line.geometry {
            FoldGeometry::FullWidth { position: current } => {
                if position.is_finite() {
                    *current = sheet.clamp_position(position);
                }
                true
            }
            FoldGeometry::Segment { .. } => {
                debug!(%id, "set_position ignored: segment fold line");
                false
            }
        }
    }

    /// Move one or both endpoints of a segment fold.
    ///
    /// Points are clamped; a non-finite point keeps the prior value.
    pub fn set_endpoints(
        &mut self,
        id: &FoldLineId,
        start: Option<Point2D>,
        end: Option<Point2D>,
    ) -> bool {
        let sheet = self.sheet;
        let Some(line) = self.lookup_mut(id) else {
            return false;
        };
        match &mut line.geometry {
            FoldGeometry::Segment {
                start: cur_start,
                end: cur_end,
            } => {
                if let Some(p) = start.filter(Point2D::is_finite) {
                    *cur_start = sheet.clamp_point(p);
                }
                if let Some(p) = end.filter(Point2D::is_finite) {
                    *cur_end = sheet.clamp_point(p);
                }
                true
            }
            FoldGeometry::FullWidth { .. } => {
                debug!(%id, "set_endpoints ignored: full-width fold line");
                false
            }
        }
    }

    /// Set a fold line's direction.
    pub fn set_direction(&mut self, id: &FoldLineId, direction: FoldDirection) -> bool {
        match self.lookup_mut(id) {
            Some(line) => {
                line.direction = direction;
                true
            }
            None => false,
        }
    }

    /// Flip a fold line between up and down.
    pub fn toggle_direction(&mut self, id: &FoldLineId) -> bool {
        match self.lookup_mut(id) {
            Some(line) => {
                line.direction = line.direction.toggled();
                true
            }
            None => false,
        }
    }

    /// Move a segment endpoint to the sheet edge nearest `raw`.
    ///
    /// `raw` is in sheet-local millimeters and may lie outside the sheet.
    pub fn drag_endpoint(&mut self, id: &FoldLineId, endpoint: Endpoint, raw: Point2D) -> bool {
        let snapped = snap_to_edge(raw, &self.sheet);
        match endpoint {
            Endpoint::Start => self.set_endpoints(id, Some(snapped), None),
            Endpoint::End => self.set_endpoints(id, None, Some(snapped)),
        }
    }

    fn lookup_mut(&mut self, id: &FoldLineId) -> Option<&mut FoldLine> {
        let found = self.fold_line_mut(id);
        if found.is_none() {
            debug!(%id, "update ignored: unknown fold line");
        }
        found
    }

    fn ensure_kind(&self, kind: FoldKind) -> Result<()> {
        match self.kind() {
            Some(existing) if existing != kind => Err(IrError::MixedGeometry),
            _ => Ok(()),
        }
    }

    fn fresh_id(&self) -> FoldLineId {
        loop {
            let id = FoldLineId::generate();
            if self.fold_line(&id).is_none() {
                return id;
            }
        }
    }
}

#![warn(missing_docs)]

//! Fold specification for the crease fold engine.
//!
//! A [`FoldSpec`] describes a rectangular flat sheet and the fold lines
//! creased into it. It is plain data: segment building, projection and
//! flat-pattern emission are pure functions over it, implemented in the
//! kernel crates.
//!
//! The JSON snapshot format is shared with external persistence:
//!
//! ```json
//! { "width": 300, "length": 200,
//!   "foldLines": [{ "id": "fold-1", "position": 100, "direction": "up" }] }
//! ```
//!
//! A fold line is either full-width (`position`) or a segment
//! (`startPoint` + `endPoint`); one design commits to one shape.

use crease_math::Tolerance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

pub mod edit;
pub mod error;
pub mod snap;

pub use edit::Endpoint;
pub use error::{IrError, Result};
pub use snap::{nearest_edge, snap_to_edge, SheetEdge};

/// Default sheet width for a new design (mm).
pub const DEFAULT_WIDTH: f64 = 300.0;

/// Default sheet length for a new design (mm).
pub const DEFAULT_LENGTH: f64 = 200.0;

/// Default name for a new design.
pub const DEFAULT_NAME: &str = "New Design";

/// A point in sheet-local millimeters.
///
/// Serializes as `{x, y}`; convertible to and from [`crease_math::Point2`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate (across the sheet width).
    pub x: f64,
    /// Y coordinate (along the sheet length).
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<crease_math::Point2> for Point2D {
    fn from(p: crease_math::Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for crease_math::Point2 {
    fn from(p: Point2D) -> Self {
        crease_math::Point2::new(p.x, p.y)
    }
}

/// Which way a fold bends the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldDirection {
    /// Toward +Z (positive fold angle).
    #[default]
    Up,
    /// Toward -Z (negative fold angle).
    Down,
}

impl FoldDirection {
    /// The opposite direction. Applying it twice yields the original.
    pub fn toggled(self) -> Self {
        match self {
            FoldDirection::Up => FoldDirection::Down,
            FoldDirection::Down => FoldDirection::Up,
        }
    }

    /// `+1.0` for [`FoldDirection::Up`], `-1.0` for [`FoldDirection::Down`].
    pub fn sign(self) -> f64 {
        match self {
            FoldDirection::Up => 1.0,
            FoldDirection::Down => -1.0,
        }
    }
}

impl fmt::Display for FoldDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldDirection::Up => write!(f, "up"),
            FoldDirection::Down => write!(f, "down"),
        }
    }
}

/// Stable identifier of a fold line. Never reused within a design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoldLineId(String);

impl FoldLineId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh `fold-xxxxxxxxx` id.
    pub fn generate() -> Self {
        let raw = Uuid::new_v4().simple().to_string();
        Self(format!("fold-{}", &raw[..9]))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoldLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FoldLineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The two fold-line shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldKind {
    /// Spans the full sheet width at a position along the length.
    FullWidth,
    /// Runs between two arbitrary points on the sheet.
    Segment,
}

/// Geometry of a fold line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FoldGeometry {
    /// Full-width fold at `position` along the length axis.
    FullWidth {
        /// Distance from the `y = 0` edge (0..length).
        position: f64,
    },
    /// Fold between two points; may be oblique and need not span the sheet.
    Segment {
        /// First endpoint.
        start: Point2D,
        /// Second endpoint.
        end: Point2D,
    },
}

impl FoldGeometry {
    /// Which shape this geometry is.
    pub fn kind(&self) -> FoldKind {
        match self {
            FoldGeometry::FullWidth { .. } => FoldKind::FullWidth,
            FoldGeometry::Segment { .. } => FoldKind::Segment,
        }
    }
}

/// A crease on the flat sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldLine {
    /// Stable identity.
    pub id: FoldLineId,
    /// Where the crease lies.
    pub geometry: FoldGeometry,
    /// Which way it bends.
    pub direction: FoldDirection,
}

impl FoldLine {
    /// Create a full-width fold line.
    pub fn full_width(id: FoldLineId, position: f64, direction: FoldDirection) -> Self {
        Self {
            id,
            geometry: FoldGeometry::FullWidth { position },
            direction,
        }
    }

    /// Create a segment fold line.
    pub fn segment(id: FoldLineId, start: Point2D, end: Point2D, direction: FoldDirection) -> Self {
        Self {
            id,
            geometry: FoldGeometry::Segment { start, end },
            direction,
        }
    }

    /// Shape of this fold line.
    pub fn kind(&self) -> FoldKind {
        self.geometry.kind()
    }

    /// A segment fold whose endpoints coincide. Full-width folds never are.
    pub fn is_degenerate(&self) -> bool {
        match self.geometry {
            FoldGeometry::FullWidth { .. } => false,
            FoldGeometry::Segment { start, end } => Tolerance::DEFAULT.is_zero(start.distance(&end)),
        }
    }

    /// The crease as a pair of sheet points; full-width folds span `0..width`.
    pub fn endpoints(&self, sheet: &Sheet) -> (Point2D, Point2D) {
        match self.geometry {
            FoldGeometry::FullWidth { position } => (
                Point2D::new(0.0, position),
                Point2D::new(sheet.width, position),
            ),
            FoldGeometry::Segment { start, end } => (start, end),
        }
    }

    fn clamp_into(&mut self, sheet: &Sheet) -> bool {
        let before = self.geometry;
        self.geometry = match self.geometry {
            FoldGeometry::FullWidth { position } => FoldGeometry::FullWidth {
                position: sheet.clamp_position(position),
            },
            FoldGeometry::Segment { start, end } => FoldGeometry::Segment {
                start: sheet.clamp_point(start),
                end: sheet.clamp_point(end),
            },
        };
        before != self.geometry
    }
}

/// Dimensions of the flat sheet in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sheet {
    /// Extent along the x axis.
    pub width: f64,
    /// Extent along the y (fold) axis.
    pub length: f64,
}

impl Sheet {
    /// Create a sheet, rejecting non-positive or non-finite dimensions.
    pub fn new(width: f64, length: f64) -> Result<Self> {
        validate_dimension("width", width)?;
        validate_dimension("length", length)?;
        Ok(Self { width, length })
    }

    /// Clamp a position along the length axis into `0..=length`.
    ///
    /// Non-finite input maps to `0`.
    pub fn clamp_position(&self, position: f64) -> f64 {
        if position.is_finite() {
            position.clamp(0.0, self.length)
        } else {
            0.0
        }
    }

    /// Clamp a point into `[0,width] x [0,length]`.
    ///
    /// Non-finite coordinates map to `0`.
    pub fn clamp_point(&self, p: Point2D) -> Point2D {
        let clamp = |v: f64, max: f64| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        Point2D::new(clamp(p.x, self.width), clamp(p.y, self.length))
    }

    /// Whether the point lies inside or on the sheet boundary.
    pub fn contains(&self, p: Point2D) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.length).contains(&p.y)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
        }
    }
}

pub(crate) fn validate_dimension(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(IrError::InvalidDimension { field, value })
    }
}

/// A sheet plus its ordered fold lines.
///
/// Fold-line order is preserved for display and flat-pattern output; segment
/// building re-sorts by position where geometry requires it. Every stored
/// coordinate lies inside the sheet, except after a dimension change until
/// [`FoldSpec::reclamp`] runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FoldSpecSnapshot", into = "FoldSpecSnapshot")]
pub struct FoldSpec {
    /// Design identifier used by persistence (`None` until first saved).
    pub id: Option<String>,
    /// Human-readable design name.
    pub name: String,
    sheet: Sheet,
    fold_lines: Vec<FoldLine>,
}

impl Default for FoldSpec {
    fn default() -> Self {
        Self::new(Sheet::default())
    }
}

impl FoldSpec {
    /// An empty design on the given sheet.
    pub fn new(sheet: Sheet) -> Self {
        Self {
            id: None,
            name: DEFAULT_NAME.to_string(),
            sheet,
            fold_lines: Vec::new(),
        }
    }

    /// A design with the given fold lines, clamped into the sheet.
    ///
    /// Fails if the lines mix shapes or repeat an id.
    pub fn with_fold_lines(sheet: Sheet, fold_lines: Vec<FoldLine>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut kind = None;
        for line in &fold_lines {
            if !seen.insert(line.id.clone()) {
                return Err(IrError::DuplicateId(line.id.to_string()));
            }
            match kind {
                None => kind = Some(line.kind()),
                Some(k) if k != line.kind() => return Err(IrError::MixedGeometry),
                Some(_) => {}
            }
        }

        let mut spec = Self::new(sheet);
        spec.fold_lines = fold_lines;
        spec.reclamp();
        Ok(spec)
    }

    /// The sheet dimensions.
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Sheet width (mm).
    pub fn width(&self) -> f64 {
        self.sheet.width
    }

    /// Sheet length (mm).
    pub fn length(&self) -> f64 {
        self.sheet.length
    }

    /// Fold lines in insertion order.
    pub fn fold_lines(&self) -> &[FoldLine] {
        &self.fold_lines
    }

    /// Look up a fold line by id.
    pub fn fold_line(&self, id: &FoldLineId) -> Option<&FoldLine> {
        self.fold_lines.iter().find(|l| &l.id == id)
    }

    /// The shape this design has committed to, if it has any fold lines.
    pub fn kind(&self) -> Option<FoldKind> {
        self.fold_lines.first().map(FoldLine::kind)
    }

    /// Serialize to a pretty-printed JSON snapshot.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from a JSON snapshot.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn fold_line_mut(&mut self, id: &FoldLineId) -> Option<&mut FoldLine> {
        self.fold_lines.iter_mut().find(|l| &l.id == id)
    }
}

// =============================================================================
// Snapshot records
// =============================================================================

/// Serialized form of a [`FoldSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldSpecSnapshot {
    /// Design identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Design name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Sheet width (mm).
    pub width: f64,
    /// Sheet length (mm).
    pub length: f64,
    /// Fold line records.
    #[serde(default)]
    pub fold_lines: Vec<FoldLineRecord>,
}

/// Serialized form of a [`FoldLine`]: either `position` or both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldLineRecord {
    /// Fold line id.
    pub id: String,
    /// Full-width position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    /// Segment start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Point2D>,
    /// Segment end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Point2D>,
    /// Fold direction.
    pub direction: FoldDirection,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl TryFrom<FoldLineRecord> for FoldLine {
    type Error = IrError;

    fn try_from(r: FoldLineRecord) -> Result<Self> {
        let id = FoldLineId::new(r.id);
        match (r.position, r.start_point, r.end_point) {
            (Some(position), None, None) => Ok(FoldLine::full_width(id, position, r.direction)),
            (None, Some(start), Some(end)) => Ok(FoldLine::segment(id, start, end, r.direction)),
            (Some(_), _, _) => Err(IrError::AmbiguousGeometry(id.to_string())),
            (None, _, _) => Err(IrError::MissingGeometry(id.to_string())),
        }
    }
}

impl From<&FoldLine> for FoldLineRecord {
    fn from(line: &FoldLine) -> Self {
        let (position, start_point, end_point) = match line.geometry {
            FoldGeometry::FullWidth { position } => (Some(position), None, None),
            FoldGeometry::Segment { start, end } => (None, Some(start), Some(end)),
        };
        Self {
            id: line.id.to_string(),
            position,
            start_point,
            end_point,
            direction: line.direction,
        }
    }
}

impl TryFrom<FoldSpecSnapshot> for FoldSpec {
    type Error = IrError;

    fn try_from(s: FoldSpecSnapshot) -> Result<Self> {
        let sheet = Sheet::new(s.width, s.length)?;
        let lines = s
            .fold_lines
            .into_iter()
            .map(FoldLine::try_from)
            .collect::<Result<Vec<_>>>()?;
        let mut spec = FoldSpec::with_fold_lines(sheet, lines)?;
        spec.id = s.id;
        spec.name = s.name;
        Ok(spec)
    }
}

impl From<FoldSpec> for FoldSpecSnapshot {
    fn from(spec: FoldSpec) -> Self {
        Self {
            fold_lines: spec.fold_lines.iter().map(FoldLineRecord::from).collect(),
            id: spec.id,
            name: spec.name,
            width: spec.sheet.width,
            length: spec.sheet.length,
        }
    }
}

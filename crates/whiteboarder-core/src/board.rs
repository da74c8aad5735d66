//! Board document and freehand strokes.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Multiplier applied to the brush size to get the eraser hit radius.
pub const ERASER_RADIUS_FACTOR: f64 = 3.0;

/// Hit radius of the eraser for a given brush size.
pub fn eraser_radius(size: u32) -> f64 {
    f64::from(size) * ERASER_RADIUS_FACTOR
}

/// Errors raised when a stroke is started with invalid brush settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrokeError {
    #[error("stroke size must be a positive integer")]
    InvalidSize,
    #[error("stroke color must not be empty")]
    EmptyColor,
}

/// A sampled pointer position in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// One continuous freehand stroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    /// CSS color string.
    pub color: String,
    /// Line width in pixels.
    pub size: u32,
    /// Points in capture order.
    pub points: Vec<Point>,
    /// Capture start time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
}

impl Stroke {
    /// Start a draft stroke at `origin`.
    pub fn begin(color: impl Into<String>, size: u32, origin: Point) -> Result<Self, StrokeError> {
        let color = color.into();
        if size == 0 {
            return Err(StrokeError::InvalidSize);
        }
        if color.trim().is_empty() {
            return Err(StrokeError::EmptyColor);
        }
        Ok(Self {
            color,
            size,
            points: vec![origin],
            timestamp: now_millis(),
        })
    }

    /// Append a sampled point. Duplicates are kept.
    pub fn push_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Check whether any point lies within `radius` of `point`.
    pub fn touches(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) <= radius)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Append to the draft if the pointer is down; otherwise do nothing.
pub fn append_point(draft: &mut Option<Stroke>, point: Point) {
    if let Some(stroke) = draft.as_mut() {
        stroke.push_point(point);
    }
}

/// Axis-aligned bounds of the drawn content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }
}

/// The whole persisted drawing for one whiteboard.
///
/// Stroke order is insertion order and doubles as z-order: later strokes are
/// painted on top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Server-assigned id; `None` until the board has been created or loaded.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl Board {
    /// Create an empty board without an id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty board with a known id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            strokes: Vec::new(),
        }
    }

    /// Move the draft to the top of the board and return a copy of it.
    ///
    /// Returns `None` without touching the board if there is no draft.
    pub fn commit(&mut self, draft: &mut Option<Stroke>) -> Option<Stroke> {
        let stroke = draft.take()?;
        self.strokes.push(stroke.clone());
        Some(stroke)
    }

    /// Append an already committed stroke.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Remove the topmost stroke.
    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Remove every stroke with at least one point within `radius` of `point`.
    /// Returns the number of strokes removed.
    pub fn erase_near(&mut self, point: Point, radius: f64) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|stroke| !stroke.touches(point, radius));
        before - self.strokes.len()
    }

    /// Remove all strokes.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Bounds over every point on the board, or `None` when nothing is drawn.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.strokes.iter().flat_map(|s| s.points.iter());
        let first = *points.next()?;
        let mut bounds = Bounds { min: first, max: first };
        for p in points {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Deserialize a board from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(i32, i32)]) -> Stroke {
        Stroke {
            color: "#000".to_string(),
            size: 4,
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_begin_stroke() {
        let s = Stroke::begin("#ff0000", 3, Point::new(1, 2)).unwrap();
        assert_eq!(s.points, vec![Point::new(1, 2)]);
        assert_eq!(s.size, 3);
        assert!(s.timestamp > 0);
    }

    #[test]
    fn test_begin_rejects_invalid_brush() {
        assert_eq!(Stroke::begin("#000", 0, Point::new(0, 0)), Err(StrokeError::InvalidSize));
        assert_eq!(Stroke::begin("  ", 2, Point::new(0, 0)), Err(StrokeError::EmptyColor));
    }

    #[test]
    fn test_append_point_keeps_order_and_duplicates() {
        let mut draft = Some(Stroke::begin("#000", 2, Point::new(0, 0)).unwrap());
        append_point(&mut draft, Point::new(1, 1));
        append_point(&mut draft, Point::new(1, 1));
        append_point(&mut draft, Point::new(2, 0));
        let points = &draft.unwrap().points;
        assert_eq!(
            points,
            &vec![Point::new(0, 0), Point::new(1, 1), Point::new(1, 1), Point::new(2, 0)]
        );
    }

    #[test]
    fn test_append_without_draft_is_noop() {
        let mut draft: Option<Stroke> = None;
        append_point(&mut draft, Point::new(5, 5));
        assert!(draft.is_none());
    }

    #[test]
    fn test_commit() {
        let mut board = Board::with_id("abc");
        let mut draft = Some(stroke(&[(0, 0), (5, 5)]));

        let committed = board.commit(&mut draft).unwrap();

        assert!(draft.is_none());
        assert_eq!(board.strokes, vec![committed]);
    }

    #[test]
    fn test_commit_without_draft() {
        let mut board = Board::new();
        let mut draft = None;
        assert!(board.commit(&mut draft).is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn test_erase_near() {
        let mut board = Board::new();
        board.push(stroke(&[(0, 0), (100, 0)]));
        board.push(stroke(&[(500, 500)]));
        board.push(stroke(&[(20, 10)]));

        // Radius 12 around (10, 10): (0, 0) is ~14.1 away, (20, 10) is 10 away.
        let removed = board.erase_near(Point::new(10, 10), eraser_radius(4));
        assert_eq!(removed, 1);
        assert_eq!(
            board.strokes,
            vec![stroke(&[(0, 0), (100, 0)]), stroke(&[(500, 500)])]
        );
    }

    #[test]
    fn test_erase_radius_is_inclusive() {
        let mut board = Board::new();
        board.push(stroke(&[(3, 4)]));
        assert_eq!(board.erase_near(Point::new(0, 0), 5.0), 1);
    }

    #[test]
    fn test_erase_out_of_range_keeps_strokes() {
        let mut board = Board::new();
        board.push(stroke(&[(100, 100)]));
        let before = board.clone();
        assert_eq!(board.erase_near(Point::new(0, 0), 6.0), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_bounds() {
        let mut board = Board::new();
        assert!(board.bounds().is_none());

        board.push(stroke(&[(10, 20), (40, 5)]));
        board.push(stroke(&[(-5, 30)]));

        let bounds = board.bounds().unwrap();
        assert_eq!(bounds.min, Point::new(-5, 5));
        assert_eq!(bounds.max, Point::new(40, 30));
        assert_eq!(bounds.width(), 45);
        assert_eq!(bounds.height(), 25);
    }

    #[test]
    fn test_server_json_without_timestamp() {
        let json = r##"{"id":"abc","strokes":[{"color":"#000","size":4,"points":[{"x":0,"y":0},{"x":5,"y":5}]}]}"##;
        let board = Board::from_json(json).unwrap();
        assert_eq!(board.id.as_deref(), Some("abc"));
        assert_eq!(board.strokes, vec![stroke(&[(0, 0), (5, 5)])]);
    }
}

//! Rectangle deltas and orientation-aware measurements
//!
//! All values are viewport pixels as reported by a bounding-rectangle query.

use serde::{Deserialize, Serialize};

/// A bounding rectangle in viewport pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Same size, moved so its top-left corner sits at `origin`
    pub fn with_origin(self, origin: Point) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            ..self
        }
    }
}

/// A 2D point or offset
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `from` to `to`
    pub fn between(from: Point, to: Point) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }
}

/// Width/height of a box, used for before/after size pairs
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<Rect> for Size {
    fn from(rect: Rect) -> Self {
        Self::new(rect.width, rect.height)
    }
}

/// Axis along which children are laid out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    /// Extent of `rect` along this axis (width or height)
    pub fn size(self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.width,
            Orientation::Vertical => rect.height,
        }
    }

    /// Component of `point` along this axis
    pub fn along(self, point: Point) -> f32 {
        match self {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        }
    }

    /// Builds a point that is `value` along this axis and zero across it
    pub fn point(self, value: f32) -> Point {
        match self {
            Orientation::Horizontal => Point::new(value, 0.0),
            Orientation::Vertical => Point::new(0.0, value),
        }
    }
}

/// Movement (and optionally resizing) of one element between two snapshots
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsChange {
    /// `after.origin - before.origin`
    pub distance: Point,
    /// Before/after sizes, present only when size changes are tracked
    pub sizes: Option<(Size, Size)>,
}

impl BoundsChange {
    /// Compare two rectangles of the same element.
    pub fn between(before: &Rect, after: &Rect, track_size: bool) -> Self {
        Self {
            distance: Point::between(before.origin(), after.origin()),
            sizes: track_size.then(|| (Size::from(*before), Size::from(*after))),
        }
    }

    /// Width/height change, if tracked
    pub fn size_delta(&self) -> Option<Size> {
        self.sizes
            .map(|(before, after)| Size::new(after.width - before.width, after.height - before.height))
    }

    /// True when at least one tracked component moved by more than `threshold`.
    ///
    /// A zero delta never exceeds, not even a zero threshold.
    pub fn exceeds(&self, threshold: f32) -> bool {
        let moved = self.distance.x.abs() > threshold || self.distance.y.abs() > threshold;
        let resized = self
            .size_delta()
            .is_some_and(|d| d.width.abs() > threshold || d.height.abs() > threshold);
        moved || resized
    }
}

/// Sum of `orientation` extents over a set of rectangles
pub fn total_size<'a>(rects: impl IntoIterator<Item = &'a Rect>, orientation: Orientation) -> f32 {
    rects.into_iter().map(|r| orientation.size(r)).sum()
}

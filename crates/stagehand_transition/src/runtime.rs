//! Host runtime seam
//!
//! Everything the controller needs from the document and its animation
//! engine goes through [`DomRuntime`]: geometry reads, scroll, reordering,
//! inline styles and keyframe playback. A browser binding implements it over
//! the real DOM; [`HeadlessDom`](crate::headless::HeadlessDom) implements it
//! in memory.

use crate::error::Result;
use stagehand_animation::{KeyframeSequence, Orientation, Rect, Timing};
use std::fmt;
use std::hash::Hash;

/// CSS `position` keyword
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    pub fn css(&self) -> &'static str {
        match self {
            Position::Static => "static",
            Position::Relative => "relative",
            Position::Absolute => "absolute",
            Position::Fixed => "fixed",
        }
    }

    /// Absolute and fixed boxes are taken out of normal flow
    pub fn is_out_of_flow(&self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
}

/// Inline style properties the controller reads or writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Position,
    Left,
    Top,
    Width,
    Height,
    Opacity,
}

impl StyleProperty {
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::Position => "position",
            StyleProperty::Left => "left",
            StyleProperty::Top => "top",
            StyleProperty::Width => "width",
            StyleProperty::Height => "height",
            StyleProperty::Opacity => "opacity",
        }
    }
}

/// An inline style value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StyleValue {
    Position(Position),
    /// Length in pixels
    Px(f32),
    /// Unitless number
    Number(f32),
}

impl StyleValue {
    pub fn as_px(&self) -> Option<f32> {
        match *self {
            StyleValue::Px(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<Position> {
        match *self {
            StyleValue::Position(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Position(p) => f.write_str(p.css()),
            StyleValue::Px(v) => write!(f, "{}px", v + 0.0),
            StyleValue::Number(v) => write!(f, "{}", v + 0.0),
        }
    }
}

/// Continuation run by the runtime when an animation finishes
///
/// Receives the runtime so cleanup can touch the document.
pub type FinishCallback<R> = Box<dyn FnOnce(&mut R)>;

/// Document and animation primitives of a host
///
/// # Contract
///
/// - Geometry is reported in viewport pixels.
/// - [`animate`](DomRuntime::animate) must not invoke `on_finish` before it
///   returns; completions are delivered later from the host's event loop,
///   possibly after the next update cycle has started.
pub trait DomRuntime: Sized + 'static {
    /// Element identity. Equality must be identity, not structural.
    type Element: Clone + Eq + Hash + fmt::Debug + 'static;

    /// Apply pending stylesheet work so geometry reads are current.
    fn flush_styles(&mut self);

    /// Direct children of `parent`, in document order
    fn children(&self, parent: &Self::Element) -> Vec<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Bounding rectangle, or `None` when the element is not rendered
    fn bounding_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Viewport scroll offset along `orientation`
    fn scroll_offset(&self, orientation: Orientation) -> f32;

    /// Scroll the viewport back to its origin
    fn scroll_to_origin(&mut self);

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element) -> Result<()>;

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Element, child: &Self::Element) -> Result<()>;

    fn style(&self, element: &Self::Element, property: StyleProperty) -> Option<StyleValue>;

    /// Set (or with `None`, clear) an inline style.
    fn set_style(
        &mut self,
        element: &Self::Element,
        property: StyleProperty,
        value: Option<StyleValue>,
    );

    /// Play `keyframes` on `element`.
    fn animate(
        &mut self,
        element: &Self::Element,
        keyframes: KeyframeSequence,
        timing: Timing,
        on_finish: Option<FinishCallback<Self>>,
    ) -> Result<()>;
}

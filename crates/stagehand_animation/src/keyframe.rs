//! Keyframes
//!
//! A keyframe is a style snapshot at an offset in the animation timeline.
//! Sequences are short (two or three frames), so they live inline.

use crate::geometry::{Orientation, Point, Size};
use smallvec::SmallVec;

/// Ordered keyframes of one animation
pub type KeyframeSequence = SmallVec<[Keyframe; 3]>;

/// Pivot for scale transforms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformOrigin {
    /// Top-left corner
    Start,
    /// Far edge of the given axis
    End(Orientation),
}

impl TransformOrigin {
    pub fn css(&self) -> &'static str {
        match self {
            TransformOrigin::Start => "0px 0px",
            TransformOrigin::End(Orientation::Vertical) => "0px 100%",
            TransformOrigin::End(Orientation::Horizontal) => "100% 0px",
        }
    }
}

/// Properties that can be animated in a keyframe
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeProperties {
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f32>,
    /// Translation X in pixels
    pub translate_x: Option<f32>,
    /// Translation Y in pixels
    pub translate_y: Option<f32>,
    /// Scale X factor
    pub scale_x: Option<f32>,
    /// Scale Y factor
    pub scale_y: Option<f32>,
    /// Explicit width in pixels
    pub width: Option<f32>,
    /// Explicit height in pixels
    pub height: Option<f32>,
    /// Pivot for scale; not interpolated
    pub transform_origin: Option<TransformOrigin>,
}

impl KeyframeProperties {
    /// Create properties with only opacity set
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Create properties with a two-axis translation
    pub fn translate(offset: Point) -> Self {
        Self::default().with_translate(offset)
    }

    /// Builder: translate on both axes
    pub fn with_translate(mut self, offset: Point) -> Self {
        self.translate_x = Some(offset.x);
        self.translate_y = Some(offset.y);
        self
    }

    /// Builder: translate along one axis only
    pub fn with_translate_along(mut self, orientation: Orientation, value: f32) -> Self {
        match orientation {
            Orientation::Horizontal => self.translate_x = Some(value),
            Orientation::Vertical => self.translate_y = Some(value),
        }
        self
    }

    /// Builder: scale along one axis only
    pub fn with_scale_along(mut self, orientation: Orientation, value: f32) -> Self {
        match orientation {
            Orientation::Horizontal => self.scale_x = Some(value),
            Orientation::Vertical => self.scale_y = Some(value),
        }
        self
    }

    /// Builder: explicit box size
    pub fn with_size(mut self, size: Size) -> Self {
        self.width = Some(size.width);
        self.height = Some(size.height);
        self
    }

    /// Builder: scale pivot
    pub fn with_transform_origin(mut self, origin: TransformOrigin) -> Self {
        self.transform_origin = Some(origin);
        self
    }

    /// Interpolate between two property sets
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            translate_x: lerp_opt(self.translate_x, other.translate_x, t),
            translate_y: lerp_opt(self.translate_y, other.translate_y, t),
            scale_x: lerp_opt(self.scale_x, other.scale_x, t),
            scale_y: lerp_opt(self.scale_y, other.scale_y, t),
            width: lerp_opt(self.width, other.width, t),
            height: lerp_opt(self.height, other.height, t),
            transform_origin: self.transform_origin.or(other.transform_origin),
        }
    }

    /// The `transform` value these properties describe, if any
    pub fn transform_css(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::with_capacity(2);

        match (self.translate_x, self.translate_y) {
            (Some(x), Some(y)) => parts.push(format!("translate({}px,{}px)", num(x), num(y))),
            (Some(x), None) => parts.push(format!("translateX({}px)", num(x))),
            (None, Some(y)) => parts.push(format!("translateY({}px)", num(y))),
            (None, None) => {}
        }
        match (self.scale_x, self.scale_y) {
            (Some(x), Some(y)) => parts.push(format!("scale({},{})", num(x), num(y))),
            (Some(x), None) => parts.push(format!("scaleX({})", num(x))),
            (None, Some(y)) => parts.push(format!("scaleY({})", num(y))),
            (None, None) => {}
        }

        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Keyframe object members as a web animation runtime expects them.
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(opacity) = self.opacity {
            out.push(("opacity", num(opacity).to_string()));
        }
        if let Some(origin) = self.transform_origin {
            out.push(("transformOrigin", origin.css().to_string()));
        }
        if let Some(transform) = self.transform_css() {
            out.push(("transform", transform));
        }
        if let Some(width) = self.width {
            out.push(("width", format!("{}px", num(width))));
        }
        if let Some(height) = self.height {
            out.push(("height", format!("{}px", num(height))));
        }
        out
    }
}

/// Normalizes negative zero so it renders as `0`
fn num(v: f32) -> f32 {
    v + 0.0
}

fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// A keyframe at a fixed timeline offset
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Offset (0.0 to 1.0)
    pub offset: f32,
    pub properties: KeyframeProperties,
}

impl Keyframe {
    pub fn new(offset: f32, properties: KeyframeProperties) -> Self {
        Self { offset, properties }
    }
}

/// Spread property sets evenly over the timeline, first at 0 and last at 1.
pub fn evenly_spaced<I>(frames: I) -> KeyframeSequence
where
    I: IntoIterator<Item = KeyframeProperties>,
{
    let frames: SmallVec<[KeyframeProperties; 3]> = frames.into_iter().collect();
    let last = frames.len().saturating_sub(1).max(1) as f32;
    frames
        .into_iter()
        .enumerate()
        .map(|(i, properties)| Keyframe::new(i as f32 / last, properties))
        .collect()
}

/// Properties at `progress` (already eased), interpolating linearly between
/// the surrounding keyframes.
pub fn sample(keyframes: &[Keyframe], progress: f32) -> KeyframeProperties {
    let Some(first) = keyframes.first() else {
        return KeyframeProperties::default();
    };

    let progress = progress.clamp(0.0, 1.0);
    let mut prev = first;
    let mut next = first;
    for kf in keyframes {
        if kf.offset <= progress {
            prev = kf;
        }
        if kf.offset >= progress {
            next = kf;
            break;
        }
    }

    if (next.offset - prev.offset).abs() < f32::EPSILON {
        return prev.properties.clone();
    }

    let local = (progress - prev.offset) / (next.offset - prev.offset);
    prev.properties.lerp(&next.properties, local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_spaced_offsets() {
        let seq = evenly_spaced([
            KeyframeProperties::opacity(0.0),
            KeyframeProperties::opacity(0.0),
            KeyframeProperties::opacity(1.0),
        ]);
        let offsets: Vec<f32> = seq.iter().map(|k| k.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_single_frame_sits_at_zero() {
        let seq = evenly_spaced([KeyframeProperties::opacity(1.0)]);
        assert_eq!(seq[0].offset, 0.0);
    }

    #[test]
    fn test_sample_interpolates_segment() {
        let seq = evenly_spaced([
            KeyframeProperties::opacity(1.0),
            KeyframeProperties::opacity(0.0),
            KeyframeProperties::opacity(0.0),
        ]);
        assert_eq!(sample(&seq, 0.25).opacity, Some(0.5));
        assert_eq!(sample(&seq, 0.75).opacity, Some(0.0));
        assert_eq!(sample(&seq, 1.0).opacity, Some(0.0));
    }

    #[test]
    fn test_transform_css_matches_web_syntax() {
        let flip = KeyframeProperties::translate(Point::new(-12.0, 0.0));
        assert_eq!(flip.transform_css().as_deref(), Some("translate(-12px,0px)"));

        let slide = KeyframeProperties::default().with_translate_along(Orientation::Vertical, -60.0);
        assert_eq!(slide.transform_css().as_deref(), Some("translateY(-60px)"));

        let scale = KeyframeProperties::default().with_scale_along(Orientation::Horizontal, 0.0);
        assert_eq!(scale.transform_css().as_deref(), Some("scaleX(0)"));
    }

    #[test]
    fn test_lerp_keeps_transform_origin() {
        let origin = TransformOrigin::End(Orientation::Vertical);
        let from = KeyframeProperties::opacity(0.0).with_transform_origin(origin);
        let to = KeyframeProperties::opacity(1.0).with_transform_origin(origin);

        for t in [0.0, 0.25, 0.75, 1.0] {
            assert_eq!(from.lerp(&to, t).transform_origin, Some(origin));
        }
        let bare = KeyframeProperties::opacity(1.0);
        assert_eq!(bare.lerp(&from, 0.9).transform_origin, Some(origin));
    }

    #[test]
    fn test_negative_zero_renders_as_zero() {
        let props = KeyframeProperties::translate(Point::new(-0.0, -0.0));
        assert_eq!(props.transform_css().as_deref(), Some("translate(0px,0px)"));
    }

    #[test]
    fn test_css_declarations() {
        let props = KeyframeProperties::opacity(0.0)
            .with_scale_along(Orientation::Vertical, 1.0)
            .with_transform_origin(TransformOrigin::Start);
        assert_eq!(
            props.css_declarations(),
            vec![
                ("opacity", "0".to_string()),
                ("transformOrigin", "0px 0px".to_string()),
                ("transform", "scaleY(1)".to_string()),
            ]
        );
    }
}

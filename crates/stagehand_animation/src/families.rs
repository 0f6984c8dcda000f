//! Keyframe families for entering, exiting and moving elements
//!
//! Each builder is pure: it maps a before/after pair onto a keyframe
//! sequence. Entering and exiting use the same builders with the range
//! swapped.

use crate::geometry::{BoundsChange, Orientation, Point};
use crate::keyframe::{evenly_spaced, KeyframeProperties, KeyframeSequence, TransformOrigin};

/// Start and end value of one animated quantity
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChangeRange {
    pub begin: f32,
    pub end: f32,
}

impl ChangeRange {
    pub const APPEAR: ChangeRange = ChangeRange { begin: 0.0, end: 1.0 };
    pub const DISAPPEAR: ChangeRange = ChangeRange { begin: 1.0, end: 0.0 };

    pub fn new(begin: f32, end: f32) -> Self {
        Self { begin, end }
    }
}

/// Opacity only, passing through full transparency at the midpoint.
pub fn fade_keyframes(opacity: ChangeRange) -> KeyframeSequence {
    evenly_spaced([
        KeyframeProperties::opacity(opacity.begin),
        KeyframeProperties::opacity(0.0),
        KeyframeProperties::opacity(opacity.end),
    ])
}

/// Opacity plus translation along the orientation axis.
pub fn slide_keyframes(
    orientation: Orientation,
    translate: ChangeRange,
    opacity: ChangeRange,
) -> KeyframeSequence {
    evenly_spaced([
        KeyframeProperties::opacity(opacity.begin).with_translate_along(orientation, translate.begin),
        KeyframeProperties::opacity(opacity.end).with_translate_along(orientation, translate.end),
    ])
}

/// Opacity plus scale along the orientation axis, pivoting on `origin`.
pub fn scale_keyframes(
    orientation: Orientation,
    origin: TransformOrigin,
    scale: ChangeRange,
    opacity: ChangeRange,
) -> KeyframeSequence {
    evenly_spaced([
        KeyframeProperties::opacity(opacity.begin)
            .with_transform_origin(origin)
            .with_scale_along(orientation, scale.begin),
        KeyframeProperties::opacity(opacity.end)
            .with_transform_origin(origin)
            .with_scale_along(orientation, scale.end),
    ])
}

/// Invert-then-play: pin the element at its old position (and size) and
/// animate back to identity.
pub fn bounds_change_keyframes(change: &BoundsChange) -> KeyframeSequence {
    let inverse = Point::new(-change.distance.x, -change.distance.y);
    let mut first = KeyframeProperties::translate(inverse);
    let mut last = KeyframeProperties::translate(Point::ZERO);

    if let Some((before, after)) = change.sizes {
        first = first.with_size(before);
        last = last.with_size(after);
    }

    evenly_spaced([first, last])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};

    #[test]
    fn test_fade_has_transparent_midpoint() {
        let enter = fade_keyframes(ChangeRange::APPEAR);
        let opacities: Vec<_> = enter.iter().map(|k| k.properties.opacity).collect();
        assert_eq!(opacities, vec![Some(0.0), Some(0.0), Some(1.0)]);

        let exit = fade_keyframes(ChangeRange::DISAPPEAR);
        let opacities: Vec<_> = exit.iter().map(|k| k.properties.opacity).collect();
        assert_eq!(opacities, vec![Some(1.0), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_slide_translates_along_axis_only() {
        let seq = slide_keyframes(
            Orientation::Vertical,
            ChangeRange::new(-60.0, 0.0),
            ChangeRange::APPEAR,
        );
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].properties.translate_y, Some(-60.0));
        assert_eq!(seq[0].properties.translate_x, None);
        assert_eq!(seq[1].properties.translate_y, Some(0.0));
        assert_eq!(seq[1].properties.opacity, Some(1.0));
    }

    #[test]
    fn test_scale_carries_origin_on_every_frame() {
        let origin = TransformOrigin::End(Orientation::Horizontal);
        let seq = scale_keyframes(
            Orientation::Horizontal,
            origin,
            ChangeRange::DISAPPEAR,
            ChangeRange::DISAPPEAR,
        );
        assert!(seq.iter().all(|k| k.properties.transform_origin == Some(origin)));
        assert_eq!(seq[0].properties.scale_x, Some(1.0));
        assert_eq!(seq[1].properties.scale_x, Some(0.0));
    }

    #[test]
    fn test_bounds_change_inverts_distance() {
        let before = Rect::new(0.0, 0.0, 50.0, 20.0);
        let after = Rect::new(0.0, 30.0, 50.0, 40.0);
        let change = BoundsChange::between(&before, &after, true);
        let seq = bounds_change_keyframes(&change);

        assert_eq!(seq[0].properties.translate_x, Some(-0.0));
        assert_eq!(seq[0].properties.translate_y, Some(-30.0));
        assert_eq!(seq[0].properties.height, Some(20.0));
        assert_eq!(seq[1].properties.translate_y, Some(0.0));
        assert_eq!(seq[1].properties.height, Some(40.0));
        assert_eq!(
            (seq[1].properties.width, seq[1].properties.height),
            (Some(Size::from(after).width), Some(40.0))
        );
    }
}

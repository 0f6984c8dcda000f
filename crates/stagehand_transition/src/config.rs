//! Transition configuration
//!
//! [`TransitionProps`] is what a host hands over (every field optional, so it
//! can come straight from component props). [`TransitionConfig`] is the
//! resolved, validated form the controller runs on.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use stagehand_animation::{Easing, Orientation, Timing, TransformOrigin};

pub const DEFAULT_DURATION_MS: f32 = 700.0;
pub const DEFAULT_ANIMATION_THRESHOLD: f32 = 5.0;

/// Animation family used for entering and exiting children
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Opacity only
    Fade,
    /// Opacity plus translation along the orientation axis
    Slide,
    /// Opacity plus scale along the orientation axis
    Scale,
}

/// Sign convention for slide offsets and scale pivots
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forwards,
    Backwards,
}

/// Host-facing transition options
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionProps {
    pub kind: Option<TransitionKind>,
    /// Defaults to vertical
    pub orientation: Option<Orientation>,
    /// Milliseconds
    pub duration: Option<f32>,
    /// Useful for carousels. Without it entering and exiting children scale.
    pub direction: Option<Direction>,
    /// Reset the viewport scroll after the transition. Useful for full page
    /// animations.
    pub scroll_to_start: Option<bool>,
    /// Pixels a stable child has to move before it animates
    pub animation_threshold: Option<f32>,
    /// Animate width/height changes of stable children too
    pub is_size_animated: Option<bool>,
}

/// Resolved transition options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionConfig {
    pub kind: TransitionKind,
    pub orientation: Orientation,
    pub duration_ms: f32,
    pub direction: Direction,
    pub scroll_to_start: bool,
    pub animation_threshold: f32,
    pub is_size_animated: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Scale,
            orientation: Orientation::Vertical,
            duration_ms: DEFAULT_DURATION_MS,
            direction: Direction::Forwards,
            scroll_to_start: false,
            animation_threshold: DEFAULT_ANIMATION_THRESHOLD,
            is_size_animated: false,
        }
    }
}

impl TryFrom<TransitionProps> for TransitionConfig {
    type Error = ConfigError;

    fn try_from(props: TransitionProps) -> Result<Self, Self::Error> {
        let kind = props.kind.unwrap_or(match props.direction {
            Some(_) => TransitionKind::Slide,
            None => TransitionKind::Scale,
        });

        let duration_ms = match props.duration {
            None => DEFAULT_DURATION_MS,
            Some(d) if d.is_finite() && d > 0.0 => d,
            Some(d) => return Err(ConfigError::InvalidDuration(d)),
        };

        let animation_threshold = match props.animation_threshold {
            None => DEFAULT_ANIMATION_THRESHOLD,
            Some(t) if t.is_finite() && t >= 0.0 => t,
            Some(t) => return Err(ConfigError::InvalidThreshold(t)),
        };

        Ok(Self {
            kind,
            orientation: props.orientation.unwrap_or_default(),
            duration_ms,
            direction: props.direction.unwrap_or_default(),
            scroll_to_start: props.scroll_to_start.unwrap_or(false),
            animation_threshold,
            is_size_animated: props.is_size_animated.unwrap_or(false),
        })
    }
}

impl TransitionConfig {
    /// Resolve host props, filling in defaults
    pub fn from_props(props: TransitionProps) -> Result<Self, ConfigError> {
        Self::try_from(props)
    }

    /// Timing shared by every animation this controller plays
    pub fn timing(&self) -> Timing {
        Timing::new(self.duration_ms, Easing::EaseOut)
    }

    /// Pivot for the scale family
    pub fn transform_origin(&self) -> TransformOrigin {
        match self.direction {
            Direction::Forwards => TransformOrigin::Start,
            Direction::Backwards => TransformOrigin::End(self.orientation),
        }
    }

    /// How far content shifts once exiting children vacate and entering
    /// children take up space. Only slides compensate.
    pub fn scroll_compensation(&self, previous_scroll: f32, out_size: f32, in_size: f32) -> f32 {
        if self.kind != TransitionKind::Slide {
            return 0.0;
        }
        match self.direction {
            Direction::Forwards => previous_scroll - out_size,
            Direction::Backwards => previous_scroll + in_size,
        }
    }

    /// Exiting slides during a scroll reset are pinned to the viewport.
    pub fn pins_exits_to_viewport(&self) -> bool {
        self.kind == TransitionKind::Slide && self.scroll_to_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransitionConfig::from_props(TransitionProps::default()).unwrap();
        assert_eq!(config, TransitionConfig::default());
        assert_eq!(config.kind, TransitionKind::Scale);
        assert_eq!(config.duration_ms, 700.0);
        assert_eq!(config.animation_threshold, 5.0);
        assert_eq!(config.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_direction_implies_slide() {
        let config = TransitionConfig::from_props(TransitionProps {
            direction: Some(Direction::Backwards),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.kind, TransitionKind::Slide);
        assert_eq!(config.direction, Direction::Backwards);
    }

    #[test]
    fn test_explicit_kind_wins_over_direction() {
        let config = TransitionConfig::from_props(TransitionProps {
            kind: Some(TransitionKind::Fade),
            direction: Some(Direction::Forwards),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.kind, TransitionKind::Fade);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let zero = TransitionProps {
            duration: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            TransitionConfig::from_props(zero),
            Err(ConfigError::InvalidDuration(_))
        ));

        let negative = TransitionProps {
            animation_threshold: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            TransitionConfig::from_props(negative),
            Err(ConfigError::InvalidThreshold(_))
        ));

        let zero_threshold = TransitionProps {
            animation_threshold: Some(0.0),
            ..Default::default()
        };
        assert!(TransitionConfig::from_props(zero_threshold).is_ok());
    }

    #[test]
    fn test_scroll_compensation_sign() {
        let forwards = TransitionConfig {
            kind: TransitionKind::Slide,
            ..Default::default()
        };
        assert_eq!(forwards.scroll_compensation(100.0, 40.0, 0.0), 60.0);

        let backwards = TransitionConfig {
            kind: TransitionKind::Slide,
            direction: Direction::Backwards,
            ..Default::default()
        };
        assert_eq!(backwards.scroll_compensation(100.0, 40.0, 25.0), 125.0);

        let scale = TransitionConfig::default();
        assert_eq!(scale.scroll_compensation(100.0, 40.0, 25.0), 0.0);
    }

    #[test]
    fn test_transform_origin_follows_direction() {
        let forwards = TransitionConfig::default();
        assert_eq!(forwards.transform_origin(), TransformOrigin::Start);

        let backwards = TransitionConfig {
            direction: Direction::Backwards,
            orientation: Orientation::Horizontal,
            ..Default::default()
        };
        assert_eq!(
            backwards.transform_origin(),
            TransformOrigin::End(Orientation::Horizontal)
        );
    }

    #[test]
    fn test_props_from_json() {
        let props: TransitionProps = serde_json::from_str(
            r#"{ "direction": "backwards", "orientation": "horizontal", "scrollToStart": true, "isSizeAnimated": true }"#,
        )
        .unwrap();
        let config = TransitionConfig::try_from(props).unwrap();
        assert_eq!(config.kind, TransitionKind::Slide);
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert!(config.scroll_to_start);
        assert!(config.is_size_animated);
        assert!(config.pins_exits_to_viewport());
    }
}

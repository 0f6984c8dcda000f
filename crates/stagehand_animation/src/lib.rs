//! Stagehand Animation Primitives
//!
//! Geometry and keyframe helpers for FLIP-style child transitions.
//!
//! # Features
//!
//! - **Geometry**: rectangle deltas, orientation-aware sizes, threshold checks
//! - **Keyframe Families**: fade, slide, scale and bounds-change sequences
//! - **Playback**: deterministic, tick-driven keyframe sampling with CSS easing

pub mod easing;
pub mod families;
pub mod geometry;
pub mod keyframe;
pub mod playback;
pub mod scheduler;

pub use easing::Easing;
pub use families::{
    bounds_change_keyframes, fade_keyframes, scale_keyframes, slide_keyframes, ChangeRange,
};
pub use geometry::{total_size, BoundsChange, Orientation, Point, Rect, Size};
pub use keyframe::{Keyframe, KeyframeProperties, KeyframeSequence, TransformOrigin};
pub use playback::{KeyframePlayback, Timing};
pub use scheduler::{AnimationScheduler, PlaybackId};

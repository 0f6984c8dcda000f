//! Deterministic keyframe playback
//!
//! Time is advanced explicitly with [`KeyframePlayback::tick`], so a
//! headless host can step animations frame by frame.

use crate::easing::Easing;
use crate::keyframe::{sample, KeyframeProperties, KeyframeSequence};

/// Duration and easing of one animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub duration_ms: f32,
    pub easing: Easing,
}

impl Timing {
    pub fn new(duration_ms: f32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }
}

/// A running keyframe animation
#[derive(Clone, Debug)]
pub struct KeyframePlayback {
    keyframes: KeyframeSequence,
    timing: Timing,
    current_time: f32,
    playing: bool,
}

impl KeyframePlayback {
    /// Create a playback that starts immediately
    pub fn new(keyframes: KeyframeSequence, timing: Timing) -> Self {
        Self {
            keyframes,
            timing,
            current_time: 0.0,
            playing: true,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn keyframes(&self) -> &KeyframeSequence {
        &self.keyframes
    }

    /// Linear progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.timing.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.current_time / self.timing.duration_ms).clamp(0.0, 1.0)
    }

    /// Properties at the current time
    ///
    /// Easing applies to the whole iteration; keyframes are interpolated
    /// linearly within it.
    pub fn current_properties(&self) -> KeyframeProperties {
        sample(&self.keyframes, self.timing.easing.apply(self.progress()))
    }

    /// Advance by `dt_ms`. Returns true on the tick that completes playback.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        self.current_time += dt_ms;
        if self.current_time >= self.timing.duration_ms {
            self.current_time = self.timing.duration_ms;
            self.playing = false;
            return true;
        }
        false
    }
}

//! Animation scheduler
//!
//! Owns every running playback and advances them together.

use crate::playback::KeyframePlayback;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct PlaybackId;
}

/// Ticks a set of keyframe playbacks
#[derive(Default)]
pub struct AnimationScheduler {
    playbacks: SlotMap<PlaybackId, KeyframePlayback>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            playbacks: SlotMap::with_key(),
        }
    }

    pub fn add(&mut self, playback: KeyframePlayback) -> PlaybackId {
        self.playbacks.insert(playback)
    }

    pub fn get(&self, id: PlaybackId) -> Option<&KeyframePlayback> {
        self.playbacks.get(id)
    }

    pub fn remove(&mut self, id: PlaybackId) -> Option<KeyframePlayback> {
        self.playbacks.remove(id)
    }

    /// Advance every playback by `dt_ms` and drop the ones that finished.
    ///
    /// Finished ids are returned in insertion order of the scheduler.
    pub fn tick(&mut self, dt_ms: f32) -> SmallVec<[PlaybackId; 4]> {
        let mut finished = SmallVec::new();
        for (id, playback) in self.playbacks.iter_mut() {
            if playback.tick(dt_ms) {
                finished.push(id);
            }
        }

        for id in &finished {
            self.playbacks.remove(*id);
        }

        if !finished.is_empty() {
            tracing::trace!(count = finished.len(), "playbacks finished");
        }
        finished
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        !self.playbacks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.playbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playbacks.is_empty()
    }
}

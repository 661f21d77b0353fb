//! Playback State
//!
//! Snapshot of what the player shows: play/pause, which slide is up, and how
//! far the scrub bar is filled. The two positions are independent signals:
//! the slide index follows the rotation timer and skips, the progress follows
//! the audio.

use serde::{Deserialize, Serialize};

/// Play/pause phase with the displayed slide
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Not playing, showing the slide at this index
    Paused(usize),
    /// Playing, showing the slide at this index
    Playing(usize),
}

/// Player snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Whether audio is playing and slides rotate
    pub is_playing: bool,
    /// Displayed slide, always a valid index
    pub current_slide_index: usize,
    /// Scrub bar fill, 0–100
    pub audio_progress_percent: f64,
}

impl PlaybackState {
    /// Phase view of this snapshot
    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        if self.is_playing {
            PlaybackPhase::Playing(self.current_slide_index)
        } else {
            PlaybackPhase::Paused(self.current_slide_index)
        }
    }

    /// Whether the track played to its end and has not restarted
    #[must_use]
    pub fn has_ended(&self) -> bool {
        !self.is_playing && self.audio_progress_percent >= 100.0
    }

    /// Move forward one slide, wrapping over `slide_count`
    pub(crate) fn next_slide(&mut self, slide_count: usize) {
        self.current_slide_index = (self.current_slide_index + 1) % slide_count;
    }

    /// Move back one slide, wrapping over `slide_count`
    pub(crate) fn previous_slide(&mut self, slide_count: usize) {
        self.current_slide_index = (self.current_slide_index + slide_count - 1) % slide_count;
    }
}

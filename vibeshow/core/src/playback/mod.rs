//! Slideshow Playback
//!
//! - [`audio`]: the audio collaborator and a clock-driven implementation
//! - [`state`]: the snapshot a surface renders
//! - [`controller`]: play/pause, rotation timer, skips, scrub bar
//! - [`handle`]: the controller on its own task, driven through a handle

pub mod audio;
pub mod controller;
pub mod handle;
pub mod state;

pub use audio::{AudioEvent, AudioHandle, ClockAudio, DEFAULT_TIME_UPDATE_INTERVAL};
pub use controller::{PlaybackController, PlaybackError, DEFAULT_SLIDE_INTERVAL};
pub use handle::PlaybackHandle;
pub use state::{PlaybackPhase, PlaybackState};

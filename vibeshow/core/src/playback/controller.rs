//! Playback Controller
//!
//! State machine for the slideshow player:
//!
//! ```text
//!            toggle_play (audio.play, arm timer)
//!   Paused(i) ──────────────────────────────────> Playing(i)
//!      ^  <──────────────────────────────────────    │  every slide_interval:
//!      │     toggle_play (audio.pause, drop timer)   │  i = (i + 1) mod N
//!      │                                             │
//!      └──────────── AudioEvent::Ended ──────────────┘  progress pinned to 100
//! ```
//!
//! Skips move the index in either phase without touching the timer. Audio
//! progress only moves the scrub bar.
//!
//! Arming the rotation only records the first deadline. The `Interval` itself
//! is built by [`PlaybackController::next_rotation`] on the runtime, so the
//! synchronous methods work without one. Both live in `Option`s owned by the
//! controller: there is never more than one timer, and it cannot fire once it
//! has been dropped on pause, end of track, slide replacement, or controller
//! drop.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::audio::{AudioEvent, AudioHandle};
use super::state::PlaybackState;
use crate::slides::Slide;

/// Default time each slide stays up while playing
pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_secs(5);

/// Playback errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// A player needs at least one slide
    #[error("Cannot play a slideshow without slides")]
    EmptySlides,

    /// The controller task is no longer running
    #[error("Playback controller has stopped")]
    ControllerGone,
}

/// Slideshow player driving one audio handle
pub struct PlaybackController<A: AudioHandle> {
    slides: Vec<Slide>,
    audio: A,
    state: PlaybackState,
    slide_interval: Duration,
    first_rotation: Option<Instant>,
    rotation: Option<Interval>,
}

impl<A: AudioHandle> std::fmt::Debug for PlaybackController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("slides", &self.slides.len())
            .field("state", &self.state)
            .field("slide_interval", &self.slide_interval)
            .field("rotation_armed", &self.first_rotation.is_some())
            .finish_non_exhaustive()
    }
}

impl<A: AudioHandle> PlaybackController<A> {
    /// Create a paused controller showing the first slide
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::EmptySlides`] if `slides` is empty.
    pub fn new(slides: Vec<Slide>, audio: A) -> Result<Self, PlaybackError> {
        Self::with_interval(slides, audio, DEFAULT_SLIDE_INTERVAL)
    }

    /// Create a controller with a custom rotation period
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::EmptySlides`] if `slides` is empty.
    pub fn with_interval(
        slides: Vec<Slide>,
        audio: A,
        slide_interval: Duration,
    ) -> Result<Self, PlaybackError> {
        if slides.is_empty() {
            return Err(PlaybackError::EmptySlides);
        }

        Ok(Self {
            slides,
            audio,
            state: PlaybackState::default(),
            slide_interval: slide_interval.max(Duration::from_millis(1)),
            first_rotation: None,
            rotation: None,
        })
    }

    /// Current snapshot
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Slide on screen
    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.state.current_slide_index]
    }

    /// All slides, in display order
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// The audio handle this controller owns
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Whether the rotation timer is live
    pub fn is_rotation_armed(&self) -> bool {
        self.first_rotation.is_some()
    }

    /// Play if paused, pause if playing; returns whether it is now playing
    pub fn toggle_play(&mut self) -> bool {
        if self.state.is_playing {
            self.audio.pause();
            self.state.is_playing = false;
            self.disarm_rotation();
        } else {
            self.audio.play();
            self.state.is_playing = true;
            self.arm_rotation();
        }

        tracing::debug!(
            playing = self.state.is_playing,
            slide = self.state.current_slide_index,
            "Toggled playback"
        );
        self.state.is_playing
    }

    /// Show the next slide, wrapping to the first
    pub fn skip_next(&mut self) -> usize {
        self.state.next_slide(self.slides.len());
        self.state.current_slide_index
    }

    /// Show the previous slide, wrapping to the last
    pub fn skip_previous(&mut self) -> usize {
        self.state.previous_slide(self.slides.len());
        self.state.current_slide_index
    }

    /// Seek the audio to `fraction` (0.0–1.0) of its duration
    ///
    /// Ignored while the duration is unknown. Never changes the slide.
    pub fn seek_to(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let duration = self.audio.duration();
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }

        let target = fraction.clamp(0.0, 1.0) * duration;
        self.audio.seek(target);
        tracing::debug!(seconds = target, "Seeked audio");
    }

    /// React to a notification from the audio handle
    pub fn on_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::TimeUpdate => self.on_time_update(),
            AudioEvent::Ended => self.on_ended(),
        }
    }

    /// Recompute the scrub bar from the audio position
    pub fn on_time_update(&mut self) {
        let duration = self.audio.duration();
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        let percent = self.audio.current_time() / duration * 100.0;
        if percent.is_finite() {
            self.state.audio_progress_percent = percent.clamp(0.0, 100.0);
        }
    }

    /// The track finished: stop rotating, pin the scrub bar, keep the slide
    pub fn on_ended(&mut self) {
        self.state.is_playing = false;
        self.state.audio_progress_percent = 100.0;
        self.disarm_rotation();
        tracing::info!(slide = self.state.current_slide_index, "Track ended");
    }

    /// Swap in a new slide list and start again from its first slide
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::EmptySlides`] and keeps the current slides if
    /// `slides` is empty.
    pub fn replace_slides(&mut self, slides: Vec<Slide>) -> Result<(), PlaybackError> {
        if slides.is_empty() {
            return Err(PlaybackError::EmptySlides);
        }

        self.slides = slides;
        self.state.current_slide_index = 0;
        self.disarm_rotation();
        if self.state.is_playing {
            self.arm_rotation();
        }
        Ok(())
    }

    /// Rotation timer tick: advance one slide
    pub fn rotate(&mut self) -> usize {
        self.skip_next()
    }

    /// Wait for the next rotation tick, then advance
    ///
    /// Never completes while paused. Cancel-safe, so it can sit in a
    /// `select!` next to command and audio-event branches.
    pub async fn next_rotation(&mut self) -> usize {
        let Some(start) = self.first_rotation else {
            return std::future::pending().await;
        };
        let period = self.slide_interval;
        let timer = self.rotation.get_or_insert_with(|| {
            let mut timer = tokio::time::interval_at(start, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        });
        timer.tick().await;
        self.rotate()
    }

    fn arm_rotation(&mut self) {
        self.first_rotation = Some(Instant::now() + self.slide_interval);
        self.rotation = None;
    }

    fn disarm_rotation(&mut self) {
        self.first_rotation = None;
        self.rotation = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::playback::PlaybackPhase;
    use crate::slides::ImageRef;
    use pretty_assertions::assert_eq;

    /// Audio double that records the commands it receives
    #[derive(Debug, Default)]
    pub(crate) struct RecordingAudio {
        pub commands: Vec<&'static str>,
        pub position: f64,
        pub length: f64,
    }

    impl RecordingAudio {
        pub(crate) fn with_duration(length: f64) -> Self {
            Self {
                length,
                ..Default::default()
            }
        }
    }

    impl AudioHandle for RecordingAudio {
        fn play(&mut self) {
            self.commands.push("play");
        }

        fn pause(&mut self) {
            self.commands.push("pause");
        }

        fn seek(&mut self, seconds: f64) {
            self.commands.push("seek");
            self.position = seconds;
        }

        fn current_time(&self) -> f64 {
            self.position
        }

        fn duration(&self) -> f64 {
            self.length
        }
    }

    pub(crate) fn slides(count: usize) -> Vec<Slide> {
        (0..count)
            .map(|i| Slide::new(i, &ImageRef::new("image/png", "AAAA"), format!("scene {i}")))
            .collect()
    }

    fn controller(count: usize) -> PlaybackController<RecordingAudio> {
        PlaybackController::new(slides(count), RecordingAudio::with_duration(200.0)).unwrap()
    }

    #[test]
    fn test_empty_slides_rejected() {
        let err = PlaybackController::new(Vec::new(), RecordingAudio::default()).unwrap_err();
        assert_eq!(err, PlaybackError::EmptySlides);
    }

    #[test]
    fn test_starts_paused_on_first_slide() {
        let player = controller(3);
        assert_eq!(player.state().phase(), PlaybackPhase::Paused(0));
        assert_eq!(player.current_slide().id, "slide-0");
        assert!(!player.is_rotation_armed());
    }

    #[test]
    fn test_toggle_issues_audio_commands() {
        let mut player = controller(3);

        assert!(player.toggle_play());
        assert!(player.is_rotation_armed());
        assert!(!player.toggle_play());
        assert!(!player.is_rotation_armed());
        assert_eq!(player.audio().commands, vec!["play", "pause"]);
    }

    #[test]
    fn test_state_changes_need_no_runtime() {
        let mut player = controller(2);

        assert!(player.toggle_play());
        player.replace_slides(slides(3)).unwrap();
        assert!(player.is_rotation_armed());
        player.on_ended();
        assert!(!player.is_rotation_armed());
        assert!(player.toggle_play());
        assert!(!player.toggle_play());
        assert_eq!(player.audio().commands, vec!["play", "play", "pause"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_off_runtime_ticks_from_arming() {
        let mut player = controller(3);
        player.toggle_play();
        let armed = Instant::now();

        // The timer is only built here, but keeps the deadline set on play
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(player.next_rotation().await, 1);
        assert_eq!(armed.elapsed(), Duration::from_secs(5));
    }

    #[test]
    fn test_skip_while_paused_does_not_start_playback() {
        let mut player = controller(3);

        assert_eq!(player.skip_next(), 1);
        assert_eq!(player.state().phase(), PlaybackPhase::Paused(1));
        assert_eq!(player.skip_previous(), 0);
        assert_eq!(player.skip_previous(), 2);
        assert!(player.audio().commands.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_ticks_wrap_to_first_slide() {
        let mut player = controller(3);
        player.toggle_play();
        let started = Instant::now();

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(player.next_rotation().await);
        }

        assert_eq!(seen, vec![1, 2, 0]);
        assert_eq!(player.state().current_slide_index, 0);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_n_ticks_from_any_start() {
        let mut player = controller(4);
        player.skip_next();
        player.skip_next();
        player.toggle_play();

        for _ in 0..7 {
            player.next_rotation().await;
        }
        assert_eq!(player.state().current_slide_index, (2 + 7) % 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_keeps_timer_phase() {
        let mut player = controller(5);
        player.toggle_play();
        let started = Instant::now();

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(player.skip_next(), 1);

        assert_eq!(player.next_rotation().await, 2);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_does_not_rotate() {
        let mut player = controller(3);
        player.toggle_play();
        let started = Instant::now();

        {
            let mut next = tokio_test::task::spawn(player.next_rotation());
            tokio_test::assert_pending!(next.poll());
        }
        assert_eq!(player.state().current_slide_index, 0);

        assert_eq!(player.next_rotation().await, 1);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_rotation_after_pause() {
        let mut player = controller(3);
        player.toggle_play();
        player.toggle_play();

        let waited =
            tokio::time::timeout(Duration::from_secs(60), player.next_rotation()).await;
        assert!(waited.is_err());
        assert_eq!(player.state().current_slide_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ended_stops_rotation_and_pins_progress() {
        let mut player = controller(3);
        player.toggle_play();
        player.next_rotation().await;

        player.on_audio_event(AudioEvent::Ended);

        let state = player.state();
        assert!(!state.is_playing);
        assert!(state.has_ended());
        assert_eq!(state.current_slide_index, 1);
        assert!(!player.is_rotation_armed());
        assert!(
            tokio::time::timeout(Duration::from_secs(60), player.next_rotation())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_seek_half_way() {
        let mut player = controller(3);
        player.skip_next();

        player.seek_to(0.5);

        assert!((player.audio().current_time() - 100.0).abs() < f64::EPSILON);
        assert_eq!(player.state().current_slide_index, 1);
    }

    #[test]
    fn test_seek_clamps_and_ignores_unknown_duration() {
        let mut player = controller(2);
        player.seek_to(1.7);
        assert!((player.audio().current_time() - 200.0).abs() < f64::EPSILON);

        let mut unknown =
            PlaybackController::new(slides(2), RecordingAudio::with_duration(f64::NAN)).unwrap();
        unknown.seek_to(0.5);
        assert!(unknown.audio().commands.is_empty());
    }

    #[test]
    fn test_time_update_moves_only_progress() {
        let mut player = controller(3);
        player.skip_next();
        player.seek_to(0.25);

        player.on_audio_event(AudioEvent::TimeUpdate);

        let state = player.state();
        assert!((state.audio_progress_percent - 25.0).abs() < 1e-9);
        assert_eq!(state.current_slide_index, 1);
    }

    #[test]
    fn test_time_update_without_duration_keeps_progress() {
        let mut player =
            PlaybackController::new(slides(2), RecordingAudio::with_duration(0.0)).unwrap();
        player.on_time_update();
        assert!(player.state().audio_progress_percent.abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_slides_resets_index_and_rearms() {
        let mut player = controller(3);
        player.toggle_play();
        tokio::time::advance(Duration::from_secs(4)).await;
        player.skip_next();

        assert_eq!(player.replace_slides(Vec::new()), Err(PlaybackError::EmptySlides));
        assert_eq!(player.slides().len(), 3);

        player.replace_slides(slides(2)).unwrap();
        assert_eq!(player.state().current_slide_index, 0);
        assert!(player.is_rotation_armed());

        // Fresh timer: the next tick is a full period after the replacement
        let replaced = Instant::now();
        player.next_rotation().await;
        assert_eq!(replaced.elapsed(), Duration::from_secs(5));
    }
}

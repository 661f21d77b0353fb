//! Audio Handle
//!
//! The playback controller drives audio through [`AudioHandle`] and hears
//! back through [`AudioEvent`]s on a channel, the same shape as a media
//! element with `timeupdate`/`ended` listeners.
//!
//! [`ClockAudio`] is a headless implementation: a track of known duration
//! whose position follows the tokio clock. It backs the CLI player and works
//! under a paused test clock.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Notification from the audio element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    /// Playback position moved
    TimeUpdate,
    /// Playback reached the end of the track
    Ended,
}

/// Playable audio resource
///
/// Owned exclusively by one playback controller. Implementations release
/// whatever they acquired when dropped.
pub trait AudioHandle: Send {
    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Jump to `seconds` from the start
    fn seek(&mut self, seconds: f64);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Track length in seconds (NaN while unknown)
    fn duration(&self) -> f64;
}

/// Default cadence of [`AudioEvent::TimeUpdate`] from [`ClockAudio`]
pub const DEFAULT_TIME_UPDATE_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
struct Clock {
    duration: f64,
    offset: f64,
    started_at: Option<Instant>,
}

impl Clock {
    fn position(&self) -> f64 {
        let running = self
            .started_at
            .map_or(0.0, |at| at.elapsed().as_secs_f64());
        (self.offset + running).min(self.duration)
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn stop_at(&mut self, position: f64) {
        self.offset = position;
        self.started_at = None;
    }
}

/// Clock-driven audio track
pub struct ClockAudio {
    clock: Arc<Mutex<Clock>>,
    events: mpsc::Sender<AudioEvent>,
    ticker: JoinHandle<()>,
}

impl std::fmt::Debug for ClockAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockAudio")
            .field("clock", &*self.clock.lock())
            .finish_non_exhaustive()
    }
}

impl ClockAudio {
    /// Create a paused track of `duration`, reporting time updates every
    /// `update_interval` while playing
    ///
    /// Must be called inside a tokio runtime. The returned receiver carries
    /// the track's events.
    #[must_use]
    pub fn new(
        duration: Duration,
        update_interval: Duration,
    ) -> (Self, mpsc::Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel(64);
        let clock = Arc::new(Mutex::new(Clock {
            duration: duration.as_secs_f64(),
            offset: 0.0,
            started_at: None,
        }));

        let ticker = tokio::spawn(run_ticker(
            Arc::clone(&clock),
            tx.clone(),
            update_interval.max(Duration::from_millis(1)),
        ));

        (
            Self {
                clock,
                events: tx,
                ticker,
            },
            rx,
        )
    }

    /// Whether the track is currently playing
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.clock.lock().is_playing()
    }
}

async fn run_ticker(clock: Arc<Mutex<Clock>>, tx: mpsc::Sender<AudioEvent>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let event = {
            let mut clock = clock.lock();
            if !clock.is_playing() {
                continue;
            }
            let duration = clock.duration;
            if clock.position() >= duration {
                clock.stop_at(duration);
                AudioEvent::Ended
            } else {
                AudioEvent::TimeUpdate
            }
        };

        if tx.send(event).await.is_err() {
            break;
        }
    }
}

impl AudioHandle for ClockAudio {
    fn play(&mut self) {
        let mut clock = self.clock.lock();
        if clock.is_playing() {
            return;
        }
        if clock.offset >= clock.duration {
            clock.offset = 0.0;
        }
        clock.started_at = Some(Instant::now());
    }

    fn pause(&mut self) {
        let mut clock = self.clock.lock();
        if clock.is_playing() {
            let position = clock.position();
            clock.stop_at(position);
        }
    }

    fn seek(&mut self, seconds: f64) {
        {
            let mut clock = self.clock.lock();
            let target = if seconds.is_finite() {
                seconds.clamp(0.0, clock.duration)
            } else {
                0.0
            };
            clock.offset = target;
            if clock.is_playing() {
                clock.started_at = Some(Instant::now());
            }
        }
        // A full queue only means an update is already pending
        let _ = self.events.try_send(AudioEvent::TimeUpdate);
    }

    fn current_time(&self) -> f64 {
        self.clock.lock().position()
    }

    fn duration(&self) -> f64 {
        self.clock.lock().duration
    }
}

impl Drop for ClockAudio {
    fn drop(&mut self) {
        self.ticker.abort();
        tracing::debug!("Audio clock released");
    }
}

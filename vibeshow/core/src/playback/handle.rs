//! Playback Actor
//!
//! Runs a [`PlaybackController`] on its own task so a surface can drive it
//! from anywhere. The task owns the controller (and so the audio handle) and
//! multiplexes three inputs:
//!
//! ```text
//!  rotation timer ──┐
//!  AudioEvent rx ───┼──> select! ──> PlaybackController ──> watch<PlaybackState>
//!  command rx ──────┘
//! ```
//!
//! Dropping every [`PlaybackHandle`] closes the command channel; the task
//! then exits and drops the controller, releasing the audio.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use super::audio::{AudioEvent, AudioHandle};
use super::controller::{PlaybackController, PlaybackError};
use super::state::PlaybackState;
use crate::slides::Slide;

/// Commands accepted by the playback task
#[derive(Debug)]
enum PlaybackCommand {
    TogglePlay,
    SkipNext,
    SkipPrevious,
    SeekTo(f64),
    ReplaceSlides(Vec<Slide>),
    Snapshot,
}

struct Envelope {
    command: PlaybackCommand,
    reply: oneshot::Sender<Result<PlaybackState, PlaybackError>>,
}

/// Handle to a running playback task
#[derive(Debug)]
pub struct PlaybackHandle {
    commands: mpsc::Sender<Envelope>,
    state: watch::Receiver<PlaybackState>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl PlaybackHandle {
    /// Move `controller` onto a new task fed by `audio_events`
    pub fn spawn<A>(
        controller: PlaybackController<A>,
        audio_events: mpsc::Receiver<AudioEvent>,
    ) -> Self
    where
        A: AudioHandle + 'static,
    {
        let (commands, command_rx) = mpsc::channel(32);
        let (state_tx, state) = watch::channel(controller.state());

        let task = tokio::spawn(run(controller, command_rx, audio_events, state_tx));

        Self {
            commands,
            state,
            task,
        }
    }

    /// Latest published snapshot
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    /// Stream of snapshots, starting with the current one
    #[must_use]
    pub fn changes(&self) -> WatchStream<PlaybackState> {
        WatchStream::new(self.state.clone())
    }

    /// Toggle play/pause
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ControllerGone`] if the task has stopped.
    pub async fn toggle_play(&self) -> Result<PlaybackState, PlaybackError> {
        self.request(PlaybackCommand::TogglePlay).await
    }

    /// Show the next slide
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ControllerGone`] if the task has stopped.
    pub async fn skip_next(&self) -> Result<PlaybackState, PlaybackError> {
        self.request(PlaybackCommand::SkipNext).await
    }

    /// Show the previous slide
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ControllerGone`] if the task has stopped.
    pub async fn skip_previous(&self) -> Result<PlaybackState, PlaybackError> {
        self.request(PlaybackCommand::SkipPrevious).await
    }

    /// Seek the audio to `fraction` of its duration
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ControllerGone`] if the task has stopped.
    pub async fn seek_to(&self, fraction: f64) -> Result<PlaybackState, PlaybackError> {
        self.request(PlaybackCommand::SeekTo(fraction)).await
    }

    /// Replace the slide list
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::EmptySlides`] for an empty list and
    /// [`PlaybackError::ControllerGone`] if the task has stopped.
    pub async fn replace_slides(&self, slides: Vec<Slide>) -> Result<PlaybackState, PlaybackError> {
        self.request(PlaybackCommand::ReplaceSlides(slides)).await
    }

    /// Snapshot after every event queued so far has been handled
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ControllerGone`] if the task has stopped.
    pub async fn snapshot(&self) -> Result<PlaybackState, PlaybackError> {
        self.request(PlaybackCommand::Snapshot).await
    }

    /// Stop the task and wait for it to release the audio
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Playback task ended abnormally");
        }
    }

    async fn request(&self, command: PlaybackCommand) -> Result<PlaybackState, PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| PlaybackError::ControllerGone)?;
        response.await.map_err(|_| PlaybackError::ControllerGone)?
    }
}

async fn run<A: AudioHandle>(
    mut controller: PlaybackController<A>,
    mut commands: mpsc::Receiver<Envelope>,
    mut audio_events: mpsc::Receiver<AudioEvent>,
    state_tx: watch::Sender<PlaybackState>,
) {
    let mut audio_open = true;

    loop {
        // Timer and audio first: a reply must reflect everything already due
        tokio::select! {
            biased;

            index = controller.next_rotation() => {
                tracing::trace!(slide = index, "Rotated slide");
            }

            event = audio_events.recv(), if audio_open => match event {
                Some(event) => controller.on_audio_event(event),
                None => {
                    tracing::debug!("Audio event channel closed");
                    audio_open = false;
                }
            },

            envelope = commands.recv() => match envelope {
                Some(Envelope { command, reply }) => {
                    let result = apply(&mut controller, command);
                    publish(&state_tx, controller.state());
                    // The caller may have stopped waiting
                    let _ = reply.send(result);
                    continue;
                }
                None => break,
            },
        }

        publish(&state_tx, controller.state());
    }

    tracing::debug!("Playback task stopped");
}

fn apply<A: AudioHandle>(
    controller: &mut PlaybackController<A>,
    command: PlaybackCommand,
) -> Result<PlaybackState, PlaybackError> {
    match command {
        PlaybackCommand::TogglePlay => {
            controller.toggle_play();
        }
        PlaybackCommand::SkipNext => {
            controller.skip_next();
        }
        PlaybackCommand::SkipPrevious => {
            controller.skip_previous();
        }
        PlaybackCommand::SeekTo(fraction) => controller.seek_to(fraction),
        PlaybackCommand::ReplaceSlides(slides) => controller.replace_slides(slides)?,
        PlaybackCommand::Snapshot => {}
    }
    Ok(controller.state())
}

fn publish(state_tx: &watch::Sender<PlaybackState>, state: PlaybackState) {
    state_tx.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            *current = state;
            true
        }
    });
}

//! `vibeshow play`
//!
//! Plays a generated slide directory against a clock standing in for the
//! audio element. Control lines are read from stdin:
//!
//! - `p` toggle play/pause
//! - `n` / `b` next / previous slide
//! - `s <percent>` seek
//! - `q` quit

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tracing::{info, warn};

use vibeshow_core::{
    AudioTrack, ClockAudio, PlaybackController, PlaybackHandle, PlaybackState, VibeshowConfig,
};

use crate::manifest::read_slides;

/// A parsed stdin line
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    TogglePlay,
    Next,
    Previous,
    /// Seek to this fraction of the track
    Seek(f64),
    Quit,
}

impl Control {
    /// Parse one input line; `None` for anything unrecognised
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let control = match words.next()? {
            "p" | "play" | "pause" => Self::TogglePlay,
            "n" | "next" => Self::Next,
            "b" | "back" | "prev" => Self::Previous,
            "q" | "quit" => Self::Quit,
            "s" | "seek" => {
                let percent: f64 = words.next()?.trim_end_matches('%').parse().ok()?;
                Self::Seek(percent / 100.0)
            }
            _ => return None,
        };
        Some(control)
    }
}

/// Play the slides in `slides_dir` for a track of `duration_secs`
pub async fn run(
    config: &VibeshowConfig,
    audio: &Path,
    slides_dir: &Path,
    duration_secs: f64,
) -> Result<()> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        bail!("Track duration must be a positive number of seconds");
    }

    let track = AudioTrack::from_path(audio)?;
    let (manifest, slides) = read_slides(slides_dir).await?;
    if manifest.title != track.title {
        warn!(
            track = %track.title,
            slides = %manifest.title,
            "Slides were generated for another track"
        );
    }

    let (clock, audio_events) = ClockAudio::new(
        Duration::from_secs_f64(duration_secs),
        config.time_update_interval,
    );
    let controller = PlaybackController::with_interval(slides, clock, config.slide_interval)
        .context("Slide directory is empty")?;
    let slide_ids: Vec<String> = controller.slides().iter().map(|s| s.id.clone()).collect();

    let handle = PlaybackHandle::spawn(controller, audio_events);
    let mut changes = handle.changes();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(
        title = %track.title,
        style = %manifest.style,
        slides = slide_ids.len(),
        "Ready. p=play/pause n=next b=back s <pct>=seek q=quit"
    );
    handle.toggle_play().await?;

    let mut last: Option<PlaybackState> = None;
    loop {
        tokio::select! {
            Some(state) = changes.next() => {
                report(&slide_ids, last, state);
                last = Some(state);
                if state.has_ended() {
                    info!("Track ended");
                    break;
                }
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match Control::parse(&line) {
                    Some(Control::TogglePlay) => { handle.toggle_play().await?; }
                    Some(Control::Next) => { handle.skip_next().await?; }
                    Some(Control::Previous) => { handle.skip_previous().await?; }
                    Some(Control::Seek(fraction)) => { handle.seek_to(fraction).await?; }
                    Some(Control::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "Unknown command"),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn report(slide_ids: &[String], last: Option<PlaybackState>, state: PlaybackState) {
    let slide_changed = last.map_or(true, |l| l.current_slide_index != state.current_slide_index);
    let play_changed = last.map_or(true, |l| l.is_playing != state.is_playing);

    if play_changed {
        let label = if state.is_playing { "Playing" } else { "Paused" };
        info!(playing = state.is_playing, "{label}");
    }
    if slide_changed {
        if let Some(id) = slide_ids.get(state.current_slide_index) {
            info!(
                slide = %id,
                progress = %format!("{:.0}%", state.audio_progress_percent),
                "Showing slide"
            );
        }
    }
}

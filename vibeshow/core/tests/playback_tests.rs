//! Integration tests for playback
//!
//! Generated slides flow through the workflow into a controller backed by
//! [`ClockAudio`], all on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use vibeshow_core::playback::DEFAULT_TIME_UPDATE_INTERVAL;
use vibeshow_core::service::{MockImage, MockService};
use vibeshow_core::{
    ArtStyle, AudioHandle, AudioTrack, ClockAudio, PlaybackController, PlaybackHandle,
    PlaybackPhase, Slide, SlideshowGenerator, Workflow, WorkflowStage,
};

const TICK: Duration = Duration::from_secs(5);

async fn generated_slides(count: usize) -> Vec<Slide> {
    let prompts: Vec<String> = (0..count).map(|i| format!("scene {i}")).collect();
    let service = Arc::new(MockService::with_prompts(prompts));
    let config = vibeshow_core::GenerationConfig {
        slide_count: count,
        ..Default::default()
    };

    let mut flow = Workflow::new();
    flow.choose_track(AudioTrack::from_path("Moonlight Drive.mp3").unwrap())
        .unwrap();
    flow.select_style(ArtStyle::Kidcore).unwrap();
    let (title, style) = flow.start_generation().unwrap();

    let slides = SlideshowGenerator::with_config(service, config)
        .generate_slideshow(&title, style, |_, _| {})
        .await;
    assert_eq!(
        flow.finish_generation(slides.clone()).unwrap(),
        WorkflowStage::Playing
    );
    slides
}

/// Three slides, play, three ticks: back on the first slide.
#[tokio::test(start_paused = true)]
async fn test_three_ticks_wrap_around() {
    let slides = generated_slides(3).await;
    let (audio, events) = ClockAudio::new(Duration::from_secs(60), DEFAULT_TIME_UPDATE_INTERVAL);
    let handle = PlaybackHandle::spawn(PlaybackController::new(slides, audio).unwrap(), events);

    assert_eq!(handle.state().phase(), PlaybackPhase::Paused(0));
    handle.toggle_play().await.unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        tokio::time::advance(TICK).await;
        seen.push(handle.snapshot().await.unwrap().current_slide_index);
    }
    assert_eq!(seen, vec![1, 2, 0]);

    handle.shutdown().await;
}

/// Skipping while paused moves the slide without starting playback.
#[tokio::test(start_paused = true)]
async fn test_skip_while_paused_does_not_play() {
    let slides = generated_slides(4).await;
    let (audio, events) = ClockAudio::new(Duration::from_secs(60), DEFAULT_TIME_UPDATE_INTERVAL);
    let handle = PlaybackHandle::spawn(PlaybackController::new(slides, audio).unwrap(), events);

    let state = handle.skip_next().await.unwrap();
    assert_eq!(state.phase(), PlaybackPhase::Paused(1));

    tokio::time::advance(TICK * 3).await;
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.phase(), PlaybackPhase::Paused(1));
    assert_eq!(state.audio_progress_percent, 0.0);

    handle.shutdown().await;
}

/// Seeking to half sets the audio position to half the duration and leaves
/// the slide alone.
#[tokio::test(start_paused = true)]
async fn test_seek_half_way() {
    let slides = generated_slides(3).await;
    let (audio, mut events) =
        ClockAudio::new(Duration::from_secs(200), DEFAULT_TIME_UPDATE_INTERVAL);
    let mut controller = PlaybackController::new(slides, audio).unwrap();
    controller.skip_next();

    controller.seek_to(0.5);
    assert_eq!(controller.audio().current_time(), 100.0);
    assert_eq!(controller.state().current_slide_index, 1);

    // The seek announces itself; the scrub bar follows
    let event = events.recv().await.unwrap();
    controller.on_audio_event(event);
    assert_eq!(controller.state().audio_progress_percent, 50.0);
    assert_eq!(controller.state().current_slide_index, 1);
}

/// Playing to the end stops rotation and pins the scrub bar.
#[tokio::test(start_paused = true)]
async fn test_track_end_stops_rotation() {
    let slides = generated_slides(3).await;
    let (audio, events) = ClockAudio::new(Duration::from_secs(12), Duration::from_secs(1));
    let handle = PlaybackHandle::spawn(PlaybackController::new(slides, audio).unwrap(), events);

    handle.toggle_play().await.unwrap();
    for _ in 0..13 {
        tokio::time::advance(Duration::from_secs(1)).await;
    }
    let ended = handle.snapshot().await.unwrap();
    assert!(ended.has_ended());
    // Rotations at 5s and 10s
    assert_eq!(ended.current_slide_index, 2);

    tokio::time::advance(TICK * 2).await;
    assert_eq!(handle.snapshot().await.unwrap(), ended);

    handle.shutdown().await;
}

/// A slideshow with some failed renders plays just the survivors.
#[tokio::test(start_paused = true)]
async fn test_partial_slideshow_plays() {
    let prompts: Vec<String> = (0..6).map(|i| format!("scene {i}")).collect();
    let service = MockService::with_prompts(prompts)
        .with_image_rule(|p| {
            if p.ends_with('0') || p.ends_with('3') {
                MockImage::Fail
            } else {
                MockImage::Png
            }
        })
        .shared();

    let slides = SlideshowGenerator::new(service)
        .generate_slideshow("Song", ArtStyle::Claymation, |_, _| {})
        .await;
    assert_eq!(slides.len(), 4);

    let (audio, events) = ClockAudio::new(Duration::from_secs(60), DEFAULT_TIME_UPDATE_INTERVAL);
    let handle = PlaybackHandle::spawn(PlaybackController::new(slides, audio).unwrap(), events);
    let state = handle.skip_previous().await.unwrap();
    assert_eq!(state.current_slide_index, 3);

    handle.shutdown().await;
}

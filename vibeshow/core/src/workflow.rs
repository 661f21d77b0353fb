//! Session Workflow
//!
//! The linear flow a surface walks the user through:
//!
//! ```text
//! Upload ──choose_track──> StyleSelection ──start_generation──> Generating
//!   ^                          ^                                    │
//!   │                          └──── finish_generation(empty) ──────┤
//!   │                                                               │
//!   └────────────── reset ──────── Playing <── finish_generation ───┘
//! ```
//!
//! This is presentation state only. The orchestrator never sees it; the
//! surface runs generation and feeds the outcome back in.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::slides::{GenerationStatus, Slide};
use crate::style::ArtStyle;

/// Extensions accepted as audio
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac", "opus", "webm"];

/// Notice shown when a run produced nothing
pub const EMPTY_RESULT_NOTICE: &str =
    "Oh no! The AI couldn't generate images. Try a different style!";

/// Workflow errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The file does not look like audio
    #[error("Not an audio file: {}", .0.display())]
    NotAudio(PathBuf),

    /// Generation requested before a style was picked
    #[error("No art style selected")]
    NoStyleSelected,

    /// Action not allowed in the current stage
    #[error("Cannot {action} while in {stage:?}")]
    InvalidTransition {
        /// Stage the workflow was in
        stage: WorkflowStage,
        /// Attempted action
        action: &'static str,
    },
}

/// User-provided audio track
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioTrack {
    /// File location
    pub path: PathBuf,
    /// Song title, the file name without its extension
    pub title: String,
}

impl AudioTrack {
    /// Accept `path` if its extension is a known audio format
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotAudio`] otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        let is_audio = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                AUDIO_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });

        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty());

        match (is_audio, title) {
            (true, Some(title)) => Ok(Self {
                path: path.to_path_buf(),
                title: title.to_string(),
            }),
            _ => Err(WorkflowError::NotAudio(path.to_path_buf())),
        }
    }
}

/// Stage of the workflow, without its data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowStage {
    /// Waiting for a track
    Upload,
    /// Track chosen, picking a style
    StyleSelection,
    /// Slides being generated
    Generating,
    /// Slides playing
    Playing,
}

/// Workflow state with its data
#[derive(Clone, Debug, Default)]
pub enum Workflow {
    /// Waiting for a track
    #[default]
    Upload,
    /// Picking a style
    StyleSelection {
        /// Chosen track
        track: AudioTrack,
        /// Style picked so far
        style: Option<ArtStyle>,
        /// Message from the previous attempt, if it failed
        notice: Option<String>,
    },
    /// Generation running
    Generating {
        /// Chosen track
        track: AudioTrack,
        /// Chosen style
        style: ArtStyle,
        /// Latest progress
        status: GenerationStatus,
    },
    /// Playing the result
    Playing {
        /// Chosen track
        track: AudioTrack,
        /// Style the slides were made in
        style: ArtStyle,
        /// Generated slides (never empty)
        slides: Vec<Slide>,
    },
}

impl Workflow {
    /// Fresh workflow at the upload stage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage
    #[must_use]
    pub fn stage(&self) -> WorkflowStage {
        match self {
            Self::Upload => WorkflowStage::Upload,
            Self::StyleSelection { .. } => WorkflowStage::StyleSelection,
            Self::Generating { .. } => WorkflowStage::Generating,
            Self::Playing { .. } => WorkflowStage::Playing,
        }
    }

    /// Chosen track, once there is one
    #[must_use]
    pub fn track(&self) -> Option<&AudioTrack> {
        match self {
            Self::Upload => None,
            Self::StyleSelection { track, .. }
            | Self::Generating { track, .. }
            | Self::Playing { track, .. } => Some(track),
        }
    }

    /// Take a track and move on to style selection
    ///
    /// # Errors
    ///
    /// Only allowed at the upload stage.
    pub fn choose_track(&mut self, track: AudioTrack) -> Result<(), WorkflowError> {
        self.expect_stage(WorkflowStage::Upload, "choose a track")?;
        *self = Self::StyleSelection {
            track,
            style: None,
            notice: None,
        };
        Ok(())
    }

    /// Pick (or change) the style
    ///
    /// # Errors
    ///
    /// Only allowed at the style selection stage.
    pub fn select_style(&mut self, chosen: ArtStyle) -> Result<(), WorkflowError> {
        match self {
            Self::StyleSelection { style, .. } => {
                *style = Some(chosen);
                Ok(())
            }
            _ => Err(self.invalid("select a style")),
        }
    }

    /// Enter the generating stage; returns the title and style to generate
    ///
    /// # Errors
    ///
    /// Requires the style selection stage with a style picked.
    pub fn start_generation(&mut self) -> Result<(String, ArtStyle), WorkflowError> {
        let Self::StyleSelection { track, style, .. } = self else {
            return Err(self.invalid("start generation"));
        };
        let style = style.ok_or(WorkflowError::NoStyleSelected)?;
        let track = track.clone();
        let title = track.title.clone();

        *self = Self::Generating {
            track,
            style,
            status: GenerationStatus::analyzing(),
        };
        Ok((title, style))
    }

    /// Record a progress update
    ///
    /// # Errors
    ///
    /// Only allowed while generating.
    pub fn update_status(&mut self, update: GenerationStatus) -> Result<(), WorkflowError> {
        match self {
            Self::Generating { status, .. } => {
                *status = update;
                Ok(())
            }
            _ => Err(self.invalid("report progress")),
        }
    }

    /// Latest progress while generating
    #[must_use]
    pub fn status(&self) -> Option<&GenerationStatus> {
        match self {
            Self::Generating { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Hand in the generated slides
    ///
    /// Moves to playing when there is at least one slide. An empty list goes
    /// back to style selection, keeping the style and leaving a notice.
    ///
    /// # Errors
    ///
    /// Only allowed while generating.
    pub fn finish_generation(
        &mut self,
        slides: Vec<Slide>,
    ) -> Result<WorkflowStage, WorkflowError> {
        let Self::Generating { track, style, .. } = self else {
            return Err(self.invalid("finish generation"));
        };
        let (track, style) = (track.clone(), *style);

        *self = if slides.is_empty() {
            tracing::warn!(title = %track.title, style = %style, "Generation produced no slides");
            Self::StyleSelection {
                track,
                style: Some(style),
                notice: Some(EMPTY_RESULT_NOTICE.to_string()),
            }
        } else {
            Self::Playing {
                track,
                style,
                slides,
            }
        };
        Ok(self.stage())
    }

    /// Back to the start, dropping track and slides
    pub fn reset(&mut self) {
        *self = Self::Upload;
    }

    fn expect_stage(
        &self,
        stage: WorkflowStage,
        action: &'static str,
    ) -> Result<(), WorkflowError> {
        if self.stage() == stage {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            stage: self.stage(),
            action,
        }
    }
}

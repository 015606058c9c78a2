//! Error taxonomy shared by every pipeline stage.
//!
//! A failed run is always reported as a [`PipelineError`]; it is never folded
//! into a negative detection.

use std::path::PathBuf;

use crate::render::ArtifactKind;

/// Coarse classification of a [`PipelineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input could not be read or decoded as an image.
    Decode,
    /// Numeric or structural failure inside the pipeline.
    Processing,
    /// Writing an output artifact failed.
    Io,
}

/// Errors produced while loading, processing or rendering an image.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// File unreadable, extension unsupported or pixel data undecodable.
    Decode { path: PathBuf, reason: String },
    /// A stage rejected its input (empty image, shape mismatch, ...).
    Processing { stage: &'static str, reason: String },
    /// Generic output failure (directory creation, JSON reports).
    Io { path: PathBuf, reason: String },
    /// A single visualization artifact could not be written.
    Artifact {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

impl PipelineError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn processing(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::Processing {
            stage,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Processing { .. } => ErrorKind::Processing,
            Self::Io { .. } | Self::Artifact { .. } => ErrorKind::Io,
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { path, reason } => {
                write!(f, "failed to decode {}: {reason}", path.display())
            }
            Self::Processing { stage, reason } => write!(f, "{stage} failed: {reason}"),
            Self::Io { path, reason } => write!(f, "failed to write {}: {reason}", path.display()),
            Self::Artifact { kind, path, reason } => write!(
                f,
                "failed to write {} artifact {}: {reason}",
                kind.suffix(),
                path.display()
            ),
        }
    }
}

impl std::error::Error for PipelineError {}

pub type PipelineResult<T> = Result<T, PipelineError>;

//! Error types for the notification pipeline.
//!
//! Every failure is fatal: errors are never retried, only wrapped with the
//! stage that produced them and reported by the binary.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while relaying a discussion comment.
#[derive(Error, Debug)]
pub enum NotifierError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local file exists but could not be read.
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or base64 at any decoding point.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transport-level failure (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The remote API answered with a non-success status.
    #[error("Remote error: status {status} {reason}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase or a short body excerpt.
        reason: String,
    },
}

impl NotifierError {
    /// HTTP status carried by a [`NotifierError::Remote`].
    pub fn status(&self) -> Option<u16> {
        match self {
            NotifierError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifierError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            NotifierError::Network(format!("Connection failed: {}", err))
        } else {
            NotifierError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for NotifierError {
    fn from(err: base64::DecodeError) -> Self {
        NotifierError::Decode(format!("invalid base64 content: {}", err))
    }
}

/// Result type for pipeline operations.
pub type NotifierResult<T> = std::result::Result<T, NotifierError>;

/// The pipeline stage an error surfaced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    LoadEvent,
    FetchMentionMap,
    PostMessage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::LoadEvent => "load event",
            Stage::FetchMentionMap => "fetch mention map",
            Stage::PostMessage => "post message",
        };
        f.write_str(name)
    }
}

/// A [`NotifierError`] tagged with the stage that failed.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: NotifierError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: NotifierError) -> Self {
        Self { stage, source }
    }
}

/// Attaches a [`Stage`] to a stage result.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> StageContext<T> for NotifierResult<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError::new(stage, source))
    }
}

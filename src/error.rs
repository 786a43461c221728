//! Error types shared across the player.
//!
//! Nothing in here is fatal to the process: playback errors are reported to the
//! caller and surfaced as a [`Notice`](crate::playback::Notice), extraction errors
//! are only logged.

use thiserror::Error;

use crate::playback::TransportState;

/// Why the media engine refused a play request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineRejection {
    #[error("no source is attached")]
    NoSource,

    #[error("the source has not finished loading")]
    NotReady,

    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
}

/// Errors returned by the playback controller's operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("track index {index} is out of range for a queue of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{op} is not valid while {state:?}")]
    InvalidTransition {
        op: &'static str,
        state: TransportState,
    },

    #[error("play request rejected: {0}")]
    Rejected(#[from] EngineRejection),
}

/// Tag parsing failure for a single file. Recovered by substituting fallbacks.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("tag parse error: {0}")]
    Tags(#[from] lofty::error::LoftyError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while writing the preference store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

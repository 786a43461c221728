//! Types crossing the media-engine boundary.
//!
//! Every signal an engine emits carries the [`Ticket`] of the source it refers
//! to, so the controller can discard results for a selection that is no
//! longer current.

use std::path::PathBuf;
use std::time::Duration;

use crate::library::TrackId;
use crate::resources::SourceHandle;

/// Identifies one selection: a track plus the generation it was selected in.
///
/// Selecting the same track twice yields two different tickets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub track: TrackId,
}

/// What the engine needs to attach to a track's audio.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub handle: SourceHandle,
    pub path: PathBuf,
    /// Duration read from the tags, for decoders that cannot report one.
    pub duration_hint: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalKind {
    /// The source is decodable; `duration` is in seconds (0 when unknown).
    Ready { duration: f64 },
    /// Current playback position in seconds.
    Position(f64),
    /// The source played to its end.
    Ended,
    /// A playback fault.
    Error(String),
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSignal {
    pub ticket: Ticket,
    pub kind: SignalKind,
}

impl EngineSignal {
    pub fn new(ticket: Ticket, kind: SignalKind) -> Self {
        Self { ticket, kind }
    }
}

#[derive(Debug)]
pub(super) enum EngineCmd {
    SetSource(Ticket, MediaSource),
    ClearSource,
    Load,
    Play,
    Pause,
    SetPosition(f64),
    SetVolume(f32),
    Quit,
}

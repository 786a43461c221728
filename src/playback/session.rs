use std::fmt;

use crate::error::EngineRejection;
use crate::library::Track;
use crate::resources::CoverArt;

use super::views::View;

/// Playback readiness of the current selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A track is selected; the engine has not reported ready yet.
    Loading,
    Paused,
    Playing,
}

/// Non-fatal, user-visible problem reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    PlaybackBlocked(EngineRejection),
    EngineFault(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PlaybackBlocked(r) => write!(f, "Playback blocked: {r}"),
            Notice::EngineFault(reason) => write!(f, "Playback error: {reason}"),
        }
    }
}

/// The single authoritative playback state, mutated only by the controller.
#[derive(Debug, Default)]
pub struct PlaybackSession {
    pub(super) queue: Vec<Track>,
    pub(super) current_index: Option<usize>,
    pub(super) transport: TransportState,
    pub(super) position: f64,
    pub(super) duration: f64,
    pub(super) active_view: View,
}

impl PlaybackSession {
    pub(super) fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    /// Reset the per-selection fields for a fresh selection.
    pub(super) fn begin_loading(&mut self, index: usize) {
        self.current_index = Some(index);
        self.transport = TransportState::Loading;
        self.position = 0.0;
        self.duration = 0.0;
    }

    pub(super) fn reset_idle(&mut self) {
        self.current_index = None;
        self.transport = TransportState::Idle;
        self.position = 0.0;
        self.duration = 0.0;
    }
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub queue: &'a [Track],
    pub current_index: Option<usize>,
    pub current: Option<&'a Track>,
    pub transport: TransportState,
    pub position: f64,
    pub duration: f64,
    pub active_view: View,
    pub notice: Option<&'a Notice>,
    pub volume: f32,
    /// Embedded art of the current track, if it has any.
    pub cover: Option<&'a CoverArt>,
}

/// Index after `current` in a circular queue of `len` (> 0) entries.
pub fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

/// Index before `current` in a circular queue of `len` (> 0) entries.
pub fn previous_index(current: usize, len: usize) -> usize {
    (current + len - 1) % len
}

/// Clamp `t` into `[0, duration]`. An unknown duration (0) only bounds below.
pub fn clamp_position(t: f64, duration: f64) -> f64 {
    let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
    if duration > 0.0 { t.min(duration) } else { t }
}

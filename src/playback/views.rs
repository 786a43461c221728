//! Which view owns the visible transport UI, and the position remembered for it.

use crate::config::ViewLeavePolicy;
use crate::library::TrackId;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// Track list and transport controls.
    #[default]
    Playback,
    Settings,
    About,
}

impl View {
    pub const ALL: [View; 3] = [View::Playback, View::About, View::Settings];

    pub fn title(self) -> &'static str {
        match self {
            View::Playback => "Music",
            View::Settings => "Settings",
            View::About => "About",
        }
    }

    /// The view after this one in tab order.
    pub fn cycle(self) -> View {
        let pos = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct SavedPosition {
    track: TrackId,
    seconds: f64,
}

/// Outcome of a view switch, as seen by the playback view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewChange {
    Unchanged,
    LeftPlayback,
    ReturnedToPlayback,
    /// Moved between two non-playback views.
    Elsewhere,
}

#[derive(Debug)]
pub struct ViewCoordinator {
    active: View,
    policy: ViewLeavePolicy,
    saved: Option<SavedPosition>,
    resume_on_return: bool,
}

impl ViewCoordinator {
    pub fn new(policy: ViewLeavePolicy) -> Self {
        Self {
            active: View::Playback,
            policy,
            saved: None,
            resume_on_return: false,
        }
    }

    pub fn policy(&self) -> ViewLeavePolicy {
        self.policy
    }

    pub fn is_playback_active(&self) -> bool {
        self.active == View::Playback
    }

    pub fn switch(&mut self, to: View) -> ViewChange {
        let from = self.active;
        self.active = to;
        match (from == View::Playback, to == View::Playback) {
            _ if from == to => ViewChange::Unchanged,
            (true, false) => ViewChange::LeftPlayback,
            (false, true) => ViewChange::ReturnedToPlayback,
            _ => ViewChange::Elsewhere,
        }
    }

    /// Remember `seconds` for `track`. Frozen while another view is active.
    pub fn record(&mut self, track: TrackId, seconds: f64) {
        if self.is_playback_active() {
            self.saved = Some(SavedPosition { track, seconds });
        }
    }

    pub fn saved_position_for(&self, track: TrackId) -> Option<f64> {
        self.saved
            .filter(|s| s.track == track)
            .map(|s| s.seconds)
    }

    /// Drop the saved position if it belongs to `track`.
    pub fn forget(&mut self, track: TrackId) {
        if self.saved.is_some_and(|s| s.track == track) {
            self.saved = None;
        }
    }

    pub fn clear(&mut self) {
        self.saved = None;
        self.resume_on_return = false;
    }

    pub(super) fn set_resume_on_return(&mut self, resume: bool) {
        self.resume_on_return = resume;
    }

    pub(super) fn take_resume_on_return(&mut self) -> bool {
        std::mem::take(&mut self.resume_on_return)
    }
}

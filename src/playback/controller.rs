//! The playback state machine.
//!
//! `PlaybackController` is the sole writer of the [`PlaybackSession`] and the sole
//! driver of the [`MediaEngine`]. Everything runs on the caller's thread: user
//! operations are plain method calls and engine signals are fed in through
//! [`PlaybackController::handle_signal`]. Every asynchronous completion is
//! checked against the current [`Ticket`] before it is applied.

use tracing::{debug, info, warn};

use crate::audio::{EngineSignal, MediaEngine, MediaSource, SignalKind, Ticket};
use crate::config::ViewLeavePolicy;
use crate::error::{EngineRejection, PlaybackError};
use crate::library::Track;
use crate::resources::{ResourceManager, SourceHandle};

use super::session::{
    Notice, PlaybackSession, Snapshot, TransportState, clamp_position, next_index,
    previous_index,
};
use super::views::{View, ViewChange, ViewCoordinator};

/// How close a position update must be to a seek target to count as post-seek.
const SEEK_SETTLE_TOLERANCE: f64 = 1.0;
/// Position updates discarded while waiting for a seek to settle before giving up.
const SEEK_SETTLE_LIMIT: u32 = 8;

#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    target: f64,
    discarded: u32,
}

pub struct PlaybackController<E: MediaEngine> {
    engine: E,
    session: PlaybackSession,
    resources: ResourceManager,
    views: ViewCoordinator,

    generation: u64,
    ticket: Option<Ticket>,
    attached: Option<SourceHandle>,
    play_after_load: bool,

    /// Latest engine position, updated even while another view is active.
    live_position: f64,
    pending_seek: Option<PendingSeek>,

    volume: f32,
    notice: Option<Notice>,
}

impl<E: MediaEngine> PlaybackController<E> {
    pub fn new(engine: E, policy: ViewLeavePolicy) -> Self {
        Self {
            engine,
            session: PlaybackSession::default(),
            resources: ResourceManager::new(),
            views: ViewCoordinator::new(policy),
            generation: 0,
            ticket: None,
            attached: None,
            play_after_load: false,
            live_position: 0.0,
            pending_seek: None,
            volume: 1.0,
            notice: None,
        }
    }

    // ---- published state ----

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            queue: &self.session.queue,
            current_index: self.session.current_index,
            current: self.session.current_track(),
            transport: self.session.transport,
            position: self.session.position,
            duration: self.session.duration,
            active_view: self.session.active_view,
            notice: self.notice.as_ref(),
            volume: self.volume,
            cover: self
                .session
                .current_track()
                .and_then(|t| t.cover)
                .and_then(|h| self.resources.cover(h)),
        }
    }

    pub fn queue(&self) -> &[Track] {
        &self.session.queue
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.current_index
    }

    pub fn transport(&self) -> TransportState {
        self.session.transport
    }

    pub fn position(&self) -> f64 {
        self.session.position
    }

    pub fn duration(&self) -> f64 {
        self.session.duration
    }

    pub fn active_view(&self) -> View {
        self.session.active_view
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Where new tracks must be adopted so this controller owns their handles.
    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        &mut self.resources
    }

    // ---- queue ----

    /// Install `tracks` as the new queue, revoking everything the old one owned.
    ///
    /// A non-empty queue ends up `Loading` track 0 without autoplay; an empty
    /// one leaves the controller `Idle`.
    pub fn replace_queue(&mut self, tracks: Vec<Track>) {
        let old = std::mem::replace(&mut self.session.queue, tracks);
        // The attached source (if any) is deferred until the engine lets go below.
        self.resources.revoke_all(&old);
        drop(old);

        self.invalidate_selection();
        self.session.reset_idle();
        self.views.clear();
        info!(count = self.session.queue.len(), "queue replaced");

        if self.session.queue.is_empty() {
            self.release_engine_source();
        } else if let Err(e) = self.select_track(0, false) {
            warn!(error = %e, "failed to select first track of new queue");
        }
    }

    // ---- transport ----

    pub fn select_track(
        &mut self,
        index: usize,
        play_after_load: bool,
    ) -> Result<(), PlaybackError> {
        let len = self.session.queue.len();
        if index >= len {
            return Err(PlaybackError::IndexOutOfRange { index, len });
        }

        // A fresh choice made on the playback view starts from the top.
        if self.views.is_playback_active() {
            self.views.clear();
        }

        self.invalidate_selection();
        self.session.begin_loading(index);
        self.play_after_load = play_after_load;

        let track = &self.session.queue[index];
        let ticket = Ticket {
            generation: self.generation,
            track: track.id,
        };
        let handle = track.source;
        let duration_hint = track.duration;

        let Some(path) = self.resources.attach(handle) else {
            // Only reachable if a queued track's handle was revoked out from under us.
            warn!(?handle, "selected track has no live source handle");
            self.release_engine_source();
            self.session.transport = TransportState::Paused;
            self.notice = Some(Notice::EngineFault("track source is no longer available".into()));
            return Ok(());
        };

        self.engine.set_source(
            ticket,
            MediaSource {
                handle,
                path,
                duration_hint,
            },
        );
        if let Some(previous) = self.attached.replace(handle) {
            if previous != handle {
                self.resources.detach(previous);
            }
        }
        self.ticket = Some(ticket);
        self.engine.load();

        debug!(index, ?ticket, play_after_load, "track selected");
        Ok(())
    }

    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.session.transport != TransportState::Paused {
            return Err(self.invalid("play"));
        }
        match self.engine.play() {
            Ok(()) => {
                self.session.transport = TransportState::Playing;
                self.notice = None;
                Ok(())
            }
            Err(rejection) => Err(self.rejected(rejection)),
        }
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.session.transport != TransportState::Playing {
            return Err(self.invalid("pause"));
        }
        self.engine.pause();
        self.session.transport = TransportState::Paused;
        Ok(())
    }

    /// Play/pause button: also covers the states where neither applies directly.
    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        match self.session.transport {
            TransportState::Playing => self.pause(),
            TransportState::Paused => self.play(),
            TransportState::Loading => {
                self.play_after_load = !self.play_after_load;
                Ok(())
            }
            TransportState::Idle => {
                if self.session.queue.is_empty() {
                    Err(self.invalid("toggle"))
                } else {
                    self.select_track(0, true)
                }
            }
        }
    }

    /// Ask for playback to start as soon as possible.
    pub fn request_play(&mut self) -> Result<(), PlaybackError> {
        match self.session.transport {
            TransportState::Loading => {
                self.play_after_load = true;
                Ok(())
            }
            TransportState::Playing => Ok(()),
            _ => self.toggle(),
        }
    }

    pub fn seek(&mut self, t: f64) -> Result<(), PlaybackError> {
        if !matches!(
            self.session.transport,
            TransportState::Paused | TransportState::Playing
        ) {
            return Err(self.invalid("seek"));
        }

        let target = clamp_position(t, self.session.duration);
        self.session.position = target;
        self.live_position = target;
        self.pending_seek = Some(PendingSeek {
            target,
            discarded: 0,
        });
        if let Some(ticket) = self.ticket {
            self.views.record(ticket.track, target);
        }
        self.engine.set_position(target);
        Ok(())
    }

    pub fn seek_by(&mut self, delta: f64) -> Result<(), PlaybackError> {
        self.seek(self.live_position + delta)
    }

    pub fn next(&mut self, play_after_load: bool) -> Result<(), PlaybackError> {
        let len = self.session.queue.len();
        match self.session.current_index {
            Some(cur) if len > 0 => self.select_track(next_index(cur, len), play_after_load),
            None if len > 0 => self.select_track(0, play_after_load),
            _ => Ok(()),
        }
    }

    pub fn previous(&mut self, play_after_load: bool) -> Result<(), PlaybackError> {
        let len = self.session.queue.len();
        match self.session.current_index {
            Some(cur) if len > 0 => self.select_track(previous_index(cur, len), play_after_load),
            None if len > 0 => self.select_track(len - 1, play_after_load),
            _ => Ok(()),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.engine.set_volume(self.volume);
    }

    // ---- views ----

    pub fn switch_view(&mut self, to: View) {
        let change = self.views.switch(to);
        self.session.active_view = to;

        match change {
            ViewChange::LeftPlayback => {
                if self.views.policy() == ViewLeavePolicy::Pause {
                    match self.session.transport {
                        TransportState::Playing => {
                            self.engine.pause();
                            self.session.transport = TransportState::Paused;
                            self.views.set_resume_on_return(true);
                        }
                        // The load settles to Paused; playback starts on return instead.
                        TransportState::Loading if self.play_after_load => {
                            self.play_after_load = false;
                            self.views.set_resume_on_return(true);
                        }
                        _ => {}
                    }
                }
                debug!(?to, "left playback view");
            }
            ViewChange::ReturnedToPlayback => {
                // The engine is still on the same selection: its live position wins.
                if let Some(ticket) = self.ticket {
                    if matches!(
                        self.session.transport,
                        TransportState::Paused | TransportState::Playing
                    ) {
                        self.session.position =
                            clamp_position(self.live_position, self.session.duration);
                        self.views.record(ticket.track, self.session.position);
                    }
                }
                if self.views.take_resume_on_return() {
                    match self.session.transport {
                        TransportState::Paused => {
                            if let Err(e) = self.play() {
                                warn!(error = %e, "could not resume on return to playback view");
                            }
                        }
                        TransportState::Loading => self.play_after_load = true,
                        _ => {}
                    }
                }
                debug!("returned to playback view");
            }
            ViewChange::Unchanged | ViewChange::Elsewhere => {}
        }
    }

    // ---- engine signals ----

    pub fn handle_signal(&mut self, signal: EngineSignal) {
        if self.ticket != Some(signal.ticket) {
            debug!(ticket = ?signal.ticket, kind = ?signal.kind, "discarding stale engine signal");
            return;
        }

        match signal.kind {
            SignalKind::Ready { duration } => self.on_ready(signal.ticket, duration),
            SignalKind::Position(seconds) => self.on_position(signal.ticket, seconds),
            SignalKind::Ended => self.on_ended(signal.ticket),
            SignalKind::Error(reason) => self.on_error(reason),
            SignalKind::Playing => {
                if self.session.transport == TransportState::Paused {
                    self.session.transport = TransportState::Playing;
                }
            }
            SignalKind::Paused => {
                if self.session.transport == TransportState::Playing {
                    self.session.transport = TransportState::Paused;
                }
            }
        }
    }

    fn on_ready(&mut self, ticket: Ticket, duration: f64) {
        if self.session.transport != TransportState::Loading {
            debug!(?ticket, "ready outside of loading, ignored");
            return;
        }

        self.session.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.session.transport = TransportState::Paused;

        if let Some(saved) = self.views.saved_position_for(ticket.track) {
            if saved > 0.0 {
                let target = clamp_position(saved, self.session.duration);
                self.engine.set_position(target);
                self.session.position = target;
                self.live_position = target;
                self.pending_seek = Some(PendingSeek {
                    target,
                    discarded: 0,
                });
                debug!(target, "restored saved position");
            }
        }

        if std::mem::take(&mut self.play_after_load) {
            if let Err(e) = self.play() {
                debug!(error = %e, "autoplay after load failed");
            }
        }
    }

    fn on_position(&mut self, ticket: Ticket, seconds: f64) {
        if !matches!(
            self.session.transport,
            TransportState::Playing | TransportState::Paused
        ) {
            return;
        }
        if !seconds.is_finite() {
            return;
        }

        if let Some(mut pending) = self.pending_seek {
            if (seconds - pending.target).abs() > SEEK_SETTLE_TOLERANCE {
                pending.discarded += 1;
                if pending.discarded < SEEK_SETTLE_LIMIT {
                    self.pending_seek = Some(pending);
                    return;
                }
                debug!(target = pending.target, "seek never settled, accepting engine position");
            }
            self.pending_seek = None;
        } else if seconds < self.live_position {
            return;
        }

        self.live_position = clamp_position(seconds, self.session.duration);
        if self.views.is_playback_active() {
            self.session.position = self.live_position;
            self.views.record(ticket.track, self.live_position);
        }
    }

    fn on_ended(&mut self, ticket: Ticket) {
        if self.session.transport != TransportState::Playing {
            debug!(?ticket, "end of track outside of playing, ignored");
            return;
        }
        self.views.forget(ticket.track);
        if let Err(e) = self.next(true) {
            warn!(error = %e, "auto-advance failed");
        }
    }

    fn on_error(&mut self, reason: String) {
        warn!(%reason, "engine reported an error");
        self.play_after_load = false;
        self.pending_seek = None;
        if self.session.current_index.is_some() {
            self.session.transport = TransportState::Paused;
        }
        self.notice = Some(Notice::EngineFault(reason));
    }

    // ---- teardown ----

    /// Detach the engine, revoke every owned handle and stop the engine.
    pub fn shutdown(&mut self) {
        self.invalidate_selection();
        self.release_engine_source();
        let queue = std::mem::take(&mut self.session.queue);
        self.resources.revoke_all(&queue);
        self.session.reset_idle();
        self.engine.shutdown();
        info!(
            released = self.resources.released_count(),
            remaining = self.resources.live_count(),
            "playback controller shut down"
        );
    }

    // ---- helpers ----

    /// Make every in-flight completion for the current selection stale.
    fn invalidate_selection(&mut self) {
        self.generation += 1;
        self.ticket = None;
        self.play_after_load = false;
        self.live_position = 0.0;
        self.pending_seek = None;
    }

    fn release_engine_source(&mut self) {
        self.engine.clear_source();
        if let Some(handle) = self.attached.take() {
            self.resources.detach(handle);
        }
    }

    fn invalid(&self, op: &'static str) -> PlaybackError {
        PlaybackError::InvalidTransition {
            op,
            state: self.session.transport,
        }
    }

    fn rejected(&mut self, rejection: EngineRejection) -> PlaybackError {
        warn!(%rejection, "engine rejected play request");
        self.session.transport = TransportState::Paused;
        self.notice = Some(Notice::PlaybackBlocked(rejection.clone()));
        PlaybackError::Rejected(rejection)
    }

    #[cfg(test)]
    pub(crate) fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[cfg(test)]
    pub(crate) fn ticket(&self) -> Option<Ticket> {
        self.ticket
    }
}

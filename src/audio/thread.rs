use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::player::{LoadedTicket, OutputStatus};
use super::sink::create_sink_at;
use super::types::{EngineCmd, EngineSignal, MediaSource, SignalKind, Ticket};

/// Wall-clock playback position: time accumulated while paused plus the
/// running stretch since the last resume.
#[derive(Debug, Default, Clone)]
pub(super) struct Playhead {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Playhead {
    pub(super) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    /// Jump to `to`, keeping the running/paused state.
    pub(super) fn seek(&mut self, to: Duration) {
        self.accumulated = to;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

/// The source the engine is attached to.
pub(super) struct Attached {
    ticket: Ticket,
    source: MediaSource,
    sink: Option<Sink>,
    playhead: Playhead,
    ended: bool,
}

impl Attached {
    pub(super) fn new(ticket: Ticket, source: MediaSource) -> Self {
        Self {
            ticket,
            source,
            sink: None,
            playhead: Playhead::default(),
            ended: false,
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.playhead.pause();
    }

    /// Start or continue playback. A drained source reports its end again on the next tick.
    pub(super) fn resume(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.playhead.resume();
        self.ended = false;
    }

    /// The signal for one idle tick, given whether the sink has run dry.
    pub(super) fn tick(&mut self, drained: bool) -> Option<SignalKind> {
        if !self.playhead.is_running() || self.ended {
            return None;
        }
        if drained {
            self.ended = true;
            self.playhead.pause();
            Some(SignalKind::Ended)
        } else {
            Some(SignalKind::Position(self.playhead.elapsed().as_secs_f64()))
        }
    }
}

pub(super) fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    signals: Sender<EngineSignal>,
    output: OutputStatus,
    loaded: LoadedTicket,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device");
                if let Ok(mut status) = output.lock() {
                    *status = Some(e.to_string());
                }
                None
            }
        };

        let emit = |ticket: Ticket, kind: SignalKind| {
            let _ = signals.send(EngineSignal::new(ticket, kind));
        };
        let mark_loaded = |ticket: Option<Ticket>| {
            if let Ok(mut l) = loaded.lock() {
                *l = ticket;
            }
        };

        let mut attached: Option<Attached> = None;
        let mut volume: f32 = 1.0;

        loop {
            match rx.recv_timeout(tick) {
                Ok(EngineCmd::SetSource(ticket, source)) => {
                    if let Some(mut old) = attached.take() {
                        old.stop();
                    }
                    mark_loaded(None);
                    debug!(
                        ?ticket,
                        handle = ?source.handle,
                        path = %source.path.display(),
                        "engine attached"
                    );
                    attached = Some(Attached::new(ticket, source));
                }
                Ok(EngineCmd::ClearSource) => {
                    if let Some(mut old) = attached.take() {
                        old.stop();
                    }
                    mark_loaded(None);
                }
                Ok(EngineCmd::Load) => {
                    let Some(cur) = attached.as_mut() else {
                        continue;
                    };
                    let Some(stream) = stream.as_ref() else {
                        emit(cur.ticket, SignalKind::Error("audio output unavailable".into()));
                        continue;
                    };
                    match create_sink_at(stream, &cur.source.path, Duration::ZERO, volume) {
                        Ok((sink, total)) => {
                            let duration = total
                                .or(cur.source.duration_hint)
                                .map(|d| d.as_secs_f64())
                                .unwrap_or(0.0);
                            cur.sink = Some(sink);
                            cur.playhead = Playhead::default();
                            cur.ended = false;
                            mark_loaded(Some(cur.ticket));
                            emit(cur.ticket, SignalKind::Ready { duration });
                        }
                        Err(e) => {
                            warn!(error = %e, "engine failed to load source");
                            mark_loaded(None);
                            emit(cur.ticket, SignalKind::Error(e.to_string()));
                        }
                    }
                }
                Ok(EngineCmd::Play) => {
                    let Some(cur) = attached.as_mut() else {
                        continue;
                    };
                    if cur.sink.is_none() {
                        debug!(ticket = ?cur.ticket, "play before load, ignored");
                        continue;
                    }
                    cur.resume();
                    emit(cur.ticket, SignalKind::Playing);
                }
                Ok(EngineCmd::Pause) => {
                    let Some(cur) = attached.as_mut() else {
                        continue;
                    };
                    if let Some(s) = cur.sink.as_ref() {
                        s.pause();
                        cur.playhead.pause();
                        emit(cur.ticket, SignalKind::Paused);
                    }
                }
                Ok(EngineCmd::SetPosition(secs)) => {
                    // Scrubbing: rebuild the sink and skip into the file.
                    let (Some(cur), Some(stream)) = (attached.as_mut(), stream.as_ref()) else {
                        continue;
                    };
                    if cur.sink.is_none() {
                        continue;
                    }
                    let to = Duration::from_secs_f64(secs.max(0.0));
                    if let Some(old) = cur.sink.take() {
                        old.stop();
                    }
                    match create_sink_at(stream, &cur.source.path, to, volume) {
                        Ok((sink, _)) => {
                            if cur.playhead.is_running() {
                                sink.play();
                            }
                            cur.sink = Some(sink);
                            cur.playhead.seek(to);
                            cur.ended = false;
                            emit(cur.ticket, SignalKind::Position(to.as_secs_f64()));
                        }
                        Err(e) => {
                            warn!(error = %e, "engine failed to seek");
                            cur.playhead.pause();
                            mark_loaded(None);
                            emit(cur.ticket, SignalKind::Error(e.to_string()));
                        }
                    }
                }
                Ok(EngineCmd::SetVolume(v)) => {
                    volume = v.clamp(0.0, 1.0);
                    if let Some(s) = attached.as_ref().and_then(|c| c.sink.as_ref()) {
                        s.set_volume(volume);
                    }
                }
                Ok(EngineCmd::Quit) => {
                    if let Some(mut cur) = attached.take() {
                        cur.stop();
                    }
                    mark_loaded(None);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let Some(cur) = attached.as_mut() else {
                        continue;
                    };
                    let drained = cur.sink.as_ref().map(Sink::empty).unwrap_or(false);
                    if let Some(kind) = cur.tick(drained) {
                        emit(cur.ticket, kind);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::error::EngineRejection;

use super::engine::MediaEngine;
use super::thread::spawn_engine_thread;
use super::types::{EngineCmd, EngineSignal, MediaSource, Ticket};

/// Why the output device could not be opened, if it could not.
pub(super) type OutputStatus = Arc<Mutex<Option<String>>>;

/// The ticket whose source currently has a decodable sink, written by the engine thread.
pub(super) type LoadedTicket = Arc<Mutex<Option<Ticket>>>;

/// [`MediaEngine`] backed by a `rodio` output stream on a dedicated thread.
pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    output: OutputStatus,
    loaded: LoadedTicket,
    ticket: Option<Ticket>,
    join: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Start the engine thread; its signals are delivered on `signals`.
    pub fn spawn(signals: Sender<EngineSignal>, settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let output: OutputStatus = Arc::new(Mutex::new(None));
        let loaded: LoadedTicket = Arc::new(Mutex::new(None));
        let tick = Duration::from_millis(settings.tick_ms.max(1));

        let join = spawn_engine_thread(rx, signals, output.clone(), loaded.clone(), tick);

        Self {
            tx,
            output,
            loaded,
            ticket: None,
            join: Some(join),
        }
    }

    fn send(&self, cmd: EngineCmd) {
        // A dead engine thread surfaces as missing signals, not as a panic here.
        let _ = self.tx.send(cmd);
    }
}

impl MediaEngine for RodioEngine {
    fn set_source(&mut self, ticket: Ticket, source: MediaSource) {
        self.ticket = Some(ticket);
        self.send(EngineCmd::SetSource(ticket, source));
    }

    fn clear_source(&mut self) {
        self.ticket = None;
        self.send(EngineCmd::ClearSource);
    }

    fn load(&mut self) {
        self.send(EngineCmd::Load);
    }

    fn play(&mut self) -> Result<(), EngineRejection> {
        let Some(ticket) = self.ticket else {
            return Err(EngineRejection::NoSource);
        };
        if let Some(reason) = self.output.lock().ok().and_then(|s| s.clone()) {
            return Err(EngineRejection::OutputUnavailable(reason));
        }
        // Ready is only emitted after the sink exists, so this is settled by the
        // time the controller asks to play a loaded source.
        if self.loaded.lock().ok().and_then(|l| *l) != Some(ticket) {
            return Err(EngineRejection::NotReady);
        }
        self.send(EngineCmd::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.send(EngineCmd::Pause);
    }

    fn set_position(&mut self, seconds: f64) {
        self.send(EngineCmd::SetPosition(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(EngineCmd::SetVolume(volume));
    }

    fn shutdown(&mut self) {
        self.send(EngineCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

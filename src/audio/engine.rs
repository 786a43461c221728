use crate::error::EngineRejection;

use super::types::{MediaSource, Ticket};

/// The component that actually decodes and outputs audio.
///
/// Calls are requests; outcomes arrive later as [`EngineSignal`](super::EngineSignal)s
/// tagged with the ticket passed to [`set_source`](MediaEngine::set_source). The
/// playback controller is the only caller.
pub trait MediaEngine {
    /// Attach to `source`, detaching from whatever was attached before.
    fn set_source(&mut self, ticket: Ticket, source: MediaSource);
    /// Detach from the current source, if any.
    fn clear_source(&mut self);
    /// Start decoding the attached source; answered by `Ready` or `Error`.
    fn load(&mut self);
    /// Start output. Refusals are reported synchronously.
    fn play(&mut self) -> Result<(), EngineRejection>;
    fn pause(&mut self);
    fn set_position(&mut self, seconds: f64);
    /// Output volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    /// Stop the engine for good.
    fn shutdown(&mut self) {}
}

//! Media-engine boundary and the `rodio` implementation of it.
//!
//! The engine owns decoding and output; the playback controller drives it
//! through [`MediaEngine`] and consumes the [`EngineSignal`]s it emits.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::MediaEngine;
pub use player::RodioEngine;
pub use types::{EngineSignal, MediaSource, SignalKind, Ticket};

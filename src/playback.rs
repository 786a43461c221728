//! Playback: the session state, the transport state machine and view coordination.
//!
//! The `PlaybackController` in `playback::controller` owns the queue, the engine
//! and every handle the queue's tracks refer to.

mod controller;
mod session;
mod views;

pub use controller::PlaybackController;
pub use session::{
    Notice, PlaybackSession, Snapshot, TransportState, clamp_position, next_index,
    previous_index,
};
pub use views::{View, ViewChange, ViewCoordinator};

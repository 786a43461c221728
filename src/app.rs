//! Application module: the UI-side model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, cached
//! display titles and user preferences.

mod model;

pub use model::*;

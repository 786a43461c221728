mod app;
mod audio;
mod config;
mod error;
mod library;
mod logging;
mod playback;
mod resources;
mod runtime;
mod store;
mod theme;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}

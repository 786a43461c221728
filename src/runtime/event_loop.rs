use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{Action, App, VOLUME_STEP};
use crate::audio::{EngineSignal, MediaEngine};
use crate::config;
use crate::error::PlaybackError;
use crate::playback::PlaybackController;
use crate::store::PreferenceStore;
use crate::ui;

use super::startup;

/// Main terminal event loop: drains engine signals into the controller, draws,
/// and handles input. Returns `Ok(())` when quit is requested.
///
/// Everything that touches the controller runs here, so it has a single writer.
pub fn run<E: MediaEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<E>,
    signals: &Receiver<EngineSignal>,
    store: Option<&PreferenceStore>,
    log_path: Option<&Path>,
) -> anyhow::Result<()> {
    loop {
        while let Ok(signal) = signals.try_recv() {
            controller.handle_signal(signal);
        }
        app.follow(controller.current_index());

        {
            let snap = controller.snapshot();
            terminal.draw(|f| ui::draw(f, app, &snap, settings, log_path))?;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = Action::from_key(key.code, controller.active_view()) else {
                    continue;
                };
                if handle_action(action, settings, app, controller, store) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one action. Returns true when the app should quit.
fn handle_action<E: MediaEngine>(
    action: Action,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<E>,
    store: Option<&PreferenceStore>,
) -> bool {
    app.status = None;
    let step = settings.playback.seek_step_seconds;

    let result: Result<(), PlaybackError> = match action {
        Action::Quit => return true,
        Action::CursorDown => {
            app.next();
            Ok(())
        }
        Action::CursorUp => {
            app.prev();
            Ok(())
        }
        Action::Activate => activate(app, controller),
        Action::TogglePlay => {
            app.follow_playback_on();
            controller.toggle()
        }
        Action::Next => {
            app.follow_playback_on();
            controller.next(true)
        }
        Action::Previous => {
            app.follow_playback_on();
            controller.previous(true)
        }
        Action::SeekForward => controller.seek_by(step),
        Action::SeekBack => controller.seek_by(-step),
        Action::CycleView => {
            controller.switch_view(controller.active_view().cycle());
            Ok(())
        }
        Action::Rescan => {
            let count = startup::load_library(controller, app, settings);
            app.set_status(format!(
                "Rescanned {}: {count} tracks",
                app.current_dir.display()
            ));
            Ok(())
        }
        Action::VolumeUp | Action::VolumeDown => {
            let delta = if action == Action::VolumeUp {
                VOLUME_STEP
            } else {
                -VOLUME_STEP
            };
            let volume = app.adjust_volume(delta);
            controller.set_volume(volume);
            save_preferences(app, store);
            Ok(())
        }
        Action::Palette(id) => {
            if app.select_palette(id) {
                save_preferences(app, store);
            }
            Ok(())
        }
        Action::DismissNotice => {
            controller.dismiss_notice();
            Ok(())
        }
    };

    if let Err(e) = result {
        // Rejections already carry a notice; the rest are keys pressed in the wrong state.
        debug!(?action, error = %e, "action not applied");
    }
    false
}

/// Enter on the list: toggle the current track, or start the one under the cursor.
fn activate<E: MediaEngine>(
    app: &mut App,
    controller: &mut PlaybackController<E>,
) -> Result<(), PlaybackError> {
    app.follow_playback_on();
    if controller.current_index() == Some(app.selected) {
        controller.toggle()
    } else {
        controller.select_track(app.selected, true)
    }
}

fn save_preferences(app: &mut App, store: Option<&PreferenceStore>) {
    let Some(store) = store else {
        return;
    };
    if let Err(e) = store.save(&app.preferences) {
        warn!(path = %store.path().display(), error = %e, "failed to save preferences");
        app.set_status(format!("Could not save preferences: {e}"));
    }
}

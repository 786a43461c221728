use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::{EngineSignal, RodioEngine};
use crate::library::TitleTidier;
use crate::logging;
use crate::playback::PlaybackController;
use crate::store::PreferenceStore;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> anyhow::Result<()> {
    let log_path = logging::init();
    let settings = settings::load_settings();

    let dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
    });
    info!(dir = %dir.display(), "starting allegro");

    let store = PreferenceStore::default_location();
    let preferences = store.as_ref().map(PreferenceStore::load).unwrap_or_default();

    let (signal_tx, signal_rx) = mpsc::channel::<EngineSignal>();
    let engine = RodioEngine::spawn(signal_tx, &settings.audio);
    let mut controller = PlaybackController::new(engine, settings.playback.view_leave);

    let mut app = App::new(
        dir,
        TitleTidier::new(&settings.library.title_noise),
        preferences,
    );
    startup::apply_preferences(&mut controller, &app);
    startup::load_library(&mut controller, &mut app, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &signal_rx,
        store.as_ref(),
        log_path.as_deref(),
    );

    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

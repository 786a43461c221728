use tracing::info;

use crate::app::App;
use crate::audio::MediaEngine;
use crate::config;
use crate::library::{MetadataExtractor, audio_only, collect_files};
use crate::playback::PlaybackController;

/// Scan the app's folder and replace the controller's queue with what was found.
///
/// Returns the number of tracks in the new queue.
pub fn load_library<E: MediaEngine>(
    controller: &mut PlaybackController<E>,
    app: &mut App,
    settings: &config::Settings,
) -> usize {
    let files = collect_files(&app.current_dir, &settings.library);
    info!(
        dir = %app.current_dir.display(),
        files = files.len(),
        audio = audio_only(&files).len(),
        "scanned folder"
    );

    let tracks = MetadataExtractor::new().extract_batch(&files, controller.resources_mut());
    controller.replace_queue(tracks);

    app.refresh_titles(controller.queue());
    app.follow_playback_on();
    app.follow(controller.current_index());

    if settings.playback.autoplay_on_load && !controller.queue().is_empty() {
        // Only fails on an empty queue.
        let _ = controller.request_play();
    }

    controller.queue().len()
}

/// Push persisted preferences into the engine.
pub fn apply_preferences<E: MediaEngine>(controller: &mut PlaybackController<E>, app: &App) {
    controller.set_volume(app.preferences.volume);
}

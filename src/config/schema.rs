use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/allegro/config.toml` or `~/.config/allegro/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ALLEGRO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Interval between engine position updates (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { tick_ms: 250 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ allegro ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start playing the first track as soon as a new folder is loaded.
    pub autoplay_on_load: bool,
    /// What happens to the engine when the playback view is left.
    pub view_leave: ViewLeavePolicy,
    /// Seconds to move when pressing `h` / `l`.
    pub seek_step_seconds: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay_on_load: false,
            view_leave: ViewLeavePolicy::Continue,
            seek_step_seconds: 5.0,
        }
    }
}

/// Engine behavior when the playback view stops being the active view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewLeavePolicy {
    /// Audio keeps playing; only the visible transport state stops updating.
    #[serde(alias = "keep-playing", alias = "keep_playing")]
    Continue,
    /// The engine is paused on leave and resumed on return if it was playing.
    #[serde(alias = "pause-engine", alias = "pause_engine")]
    Pause,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Substrings removed (case-insensitively) from displayed titles.
    pub title_noise: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            title_noise: vec![
                "[muzcha.net]".into(),
                "[muzchanet]".into(),
                "muzcha.net".into(),
                "muzchanet".into(),
            ],
        }
    }
}

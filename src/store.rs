//! Preference persistence: volume and theme colors in a small TOML file.
//!
//! Every key is validated on its own when reading, so one bad value never
//! discards the others.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::xdg_dir;
use crate::error::StoreError;
use crate::theme::{Palette, parse_hex};

#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    /// Output volume in `0.0..=1.0`.
    pub volume: f32,
    pub accent: Option<String>,
    pub background: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: 1.0,
            accent: None,
            background: None,
        }
    }
}

impl Preferences {
    pub fn palette(&self) -> Palette {
        Palette::matching(self.accent.as_deref(), self.background.as_deref())
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.accent = Some(palette.accent.to_string());
        self.background = Some(palette.background.to_string());
    }
}

#[derive(Serialize)]
struct StoredPreferences<'a> {
    volume: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    accent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/allegro/preferences.toml`, or under `~/.local/share`.
    pub fn default_location() -> Option<Self> {
        xdg_dir("XDG_DATA_HOME", ".local/share")
            .map(|d| Self::new(d.join("allegro").join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preferences. Missing or unreadable files yield defaults.
    pub fn load(&self) -> Preferences {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored preferences");
                return Preferences::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                return Preferences::default();
            }
        };

        let table: toml::Table = match text.parse() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed preferences file");
                return Preferences::default();
            }
        };

        let mut prefs = Preferences::default();
        if let Some(v) = table.get("volume") {
            match volume_value(v) {
                Some(volume) => prefs.volume = volume,
                None => warn!(value = %v, "ignoring out-of-range stored volume"),
            }
        }
        prefs.accent = color_value(&table, "accent");
        prefs.background = color_value(&table, "background");
        prefs
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredPreferences {
            volume: prefs.volume.clamp(0.0, 1.0),
            accent: prefs.accent.as_deref(),
            background: prefs.background.as_deref(),
        };
        fs::write(&self.path, toml::to_string(&stored)?)?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

fn volume_value(v: &toml::Value) -> Option<f32> {
    let n = match v {
        toml::Value::Float(f) => *f,
        toml::Value::Integer(i) => *i as f64,
        _ => return None,
    };
    (0.0..=1.0).contains(&n).then_some(n as f32)
}

fn color_value(table: &toml::Table, key: &str) -> Option<String> {
    let v = table.get(key)?;
    match v.as_str() {
        Some(s) if parse_hex(s).is_some() => Some(s.to_string()),
        _ => {
            warn!(key, value = %v, "ignoring invalid stored color");
            None
        }
    }
}

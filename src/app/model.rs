//! Application model types: `App` and `Action`.
//!
//! `App` holds what only the terminal UI cares about: the list cursor, the
//! tidied titles shown for the queue, the persisted preferences and a status
//! line. Playback state itself lives in the playback controller.

use std::path::PathBuf;

use crossterm::event::KeyCode;

use crate::library::{TitleTidier, Track};
use crate::playback::View;
use crate::store::Preferences;
use crate::theme::Palette;

/// Volume change per key press.
pub const VOLUME_STEP: f32 = 0.05;

/// A user intent decoded from a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    CursorDown,
    CursorUp,
    /// Play the track under the cursor, or toggle it if it is the current one.
    Activate,
    TogglePlay,
    Next,
    Previous,
    SeekForward,
    SeekBack,
    CycleView,
    Rescan,
    VolumeUp,
    VolumeDown,
    Palette(u8),
    DismissNotice,
}

impl Action {
    /// Map a key to an action for the given view. List and settings keys only
    /// apply on their own views.
    pub fn from_key(code: KeyCode, view: View) -> Option<Action> {
        let action = match code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char(' ') => Action::TogglePlay,
            KeyCode::Char('n') => Action::Next,
            KeyCode::Char('p') => Action::Previous,
            KeyCode::Char('l') | KeyCode::Right => Action::SeekForward,
            KeyCode::Char('h') | KeyCode::Left => Action::SeekBack,
            KeyCode::Tab => Action::CycleView,
            KeyCode::Char('r') => Action::Rescan,
            KeyCode::Esc => Action::DismissNotice,
            KeyCode::Char('j') | KeyCode::Down if view == View::Playback => Action::CursorDown,
            KeyCode::Char('k') | KeyCode::Up if view == View::Playback => Action::CursorUp,
            KeyCode::Enter if view == View::Playback => Action::Activate,
            KeyCode::Char('+') | KeyCode::Char('=') if view == View::Settings => Action::VolumeUp,
            KeyCode::Char('-') if view == View::Settings => Action::VolumeDown,
            KeyCode::Char(c @ '1'..='6') if view == View::Settings => {
                Action::Palette(c as u8 - b'0')
            }
            _ => return None,
        };
        Some(action)
    }
}

/// The main application model.
pub struct App {
    pub selected: usize,
    /// Cursor jumps to the current track whenever it changes.
    pub follow_playback: bool,
    pub current_dir: PathBuf,
    pub preferences: Preferences,
    pub status: Option<String>,

    tidier: TitleTidier,
    titles: Vec<String>,
}

impl App {
    pub fn new(current_dir: PathBuf, tidier: TitleTidier, preferences: Preferences) -> Self {
        Self {
            selected: 0,
            follow_playback: true,
            current_dir,
            preferences,
            status: None,
            tidier,
            titles: Vec::new(),
        }
    }

    /// Rebuild the cached display titles after the queue was replaced.
    pub fn refresh_titles(&mut self, queue: &[Track]) {
        self.titles = queue.iter().map(|t| self.tidier.tidy(&t.title)).collect();
        if self.selected >= self.titles.len() {
            self.selected = 0;
        }
    }

    /// Tidied title for queue entry `index`.
    pub fn display_title(&self, index: usize) -> &str {
        self.titles.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn track_count(&self) -> usize {
        self.titles.len()
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.titles.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
            self.follow_playback = false;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.titles.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
            self.follow_playback = false;
        }
    }

    /// Keep the cursor on the current track while following playback.
    pub fn follow(&mut self, current: Option<usize>) {
        if let Some(idx) = current.filter(|&i| i < self.titles.len()) {
            if self.follow_playback {
                self.selected = idx;
            }
        }
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn palette(&self) -> Palette {
        self.preferences.palette()
    }

    /// Change the volume by `delta`, snapped to whole percent. Returns the new volume.
    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        let v = (self.preferences.volume + delta).clamp(0.0, 1.0);
        self.preferences.volume = (v * 100.0).round() / 100.0;
        self.preferences.volume
    }

    /// Switch to palette `id`. Returns false for an unknown id.
    pub fn select_palette(&mut self, id: u8) -> bool {
        match Palette::by_id(id) {
            Some(p) => {
                self.preferences.set_palette(p);
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }
}

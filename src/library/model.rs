use std::path::PathBuf;
use std::time::Duration;

use crate::resources::{CoverArt, CoverHandle, SourceHandle};

/// Artist shown when the tags carry none.
pub const UNKNOWN_ARTIST: &str = "Unknown artist";
/// Album shown when the tags carry none.
pub const UNKNOWN_ALBUM: &str = "Unknown album";

/// Opaque identity of a track, unique per adopted source file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(pub(crate) u64);

/// A file offered by the file-selection surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResource {
    pub path: PathBuf,
    /// MIME type, when one could be determined.
    pub mime: Option<String>,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>, mime: Option<&str>) -> Self {
        Self {
            path: path.into(),
            mime: mime.map(str::to_string),
        }
    }

    pub fn is_audio(&self) -> bool {
        self.mime
            .as_deref()
            .map(|m| m.starts_with("audio/"))
            .unwrap_or(false)
    }

    /// File name without its extension, used as the fallback title.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("UNKNOWN")
            .to_string()
    }
}

/// Extracted metadata for one file, before any handle has been minted.
#[derive(Debug)]
pub struct TrackDraft {
    pub file: FileResource,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: Option<CoverArt>,
    pub duration: Option<Duration>,
}

/// A playable unit. Created by adopting a [`TrackDraft`], never cloned, so no two
/// live tracks can share a source handle.
#[derive(Debug)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: Option<CoverHandle>,
    pub source: SourceHandle,
    /// The file this track was built from; not owned by the track.
    pub file: FileResource,
    /// Duration reported by the tag reader, if any.
    pub duration: Option<Duration>,
}

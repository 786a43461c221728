use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::FileResource;

/// Guess a MIME type from the file extension.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "m4a" | "aac" => "audio/mp4",
        "aif" | "aiff" => "audio/aiff",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" | "nfo" | "log" | "cue" => "text/plain",
        "m3u" | "m3u8" => "application/vnd.apple.mpegurl",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and return every regular file as a [`FileResource`], sorted by path.
pub fn collect_files(dir: &Path, settings: &LibrarySettings) -> Vec<FileResource> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<FileResource> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let path = e.into_path();
            let mime = guess_mime(&path);
            FileResource::new(path, mime)
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Keep only the entries typed as audio, preserving order.
pub fn audio_only(files: &[FileResource]) -> Vec<&FileResource> {
    files.iter().filter(|f| f.is_audio()).collect()
}

//! Tag extraction: turns a batch of file resources into tracks.
//!
//! Each file is parsed independently on the rayon pool. A failure in one file never
//! affects the others; it is logged and replaced with fallback metadata.

use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use lofty::picture::{Picture, PictureType};
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::resources::{CoverArt, ResourceManager};

use super::model::{FileResource, Track, TrackDraft, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// Fields read from a file's tags. `None` means missing or blank.
#[derive(Debug, Default)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover: Option<CoverArt>,
    pub duration: Option<Duration>,
}

/// Reads tags from a file on disk.
pub trait TagReader: Sync {
    fn read(&self, path: &Path) -> Result<RawTags, ExtractionError>;
}

/// [`TagReader`] backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

/// A tag value kept as written, or `None` if it is only whitespace.
pub(super) fn non_blank(v: Option<Cow<'_, str>>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty()).map(Cow::into_owned)
}

fn cover_art(pictures: &[Picture]) -> Option<CoverArt> {
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())?;

    if picture.data().is_empty() {
        return None;
    }

    Some(CoverArt {
        mime: picture.mime_type().map(|m| m.as_str().to_string()),
        data: picture.data().to_vec(),
    })
}

impl TagReader for LoftyReader {
    fn read(&self, path: &Path) -> Result<RawTags, ExtractionError> {
        let tagged = lofty::read_from_path(path)?;

        let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(RawTags {
                duration,
                ..RawTags::default()
            });
        };

        Ok(RawTags {
            title: non_blank(tag.title()),
            artist: non_blank(tag.artist()),
            album: non_blank(tag.album()),
            cover: cover_art(tag.pictures()),
            duration,
        })
    }
}

impl TrackDraft {
    /// Metadata used when a file's tags cannot be read at all.
    pub fn fallback(file: FileResource) -> Self {
        Self {
            title: file.stem(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            cover: None,
            duration: None,
            file,
        }
    }

    fn from_tags(file: FileResource, raw: RawTags) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| file.stem()),
            artist: raw.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            album: raw.album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            cover: raw.cover,
            duration: raw.duration,
            file,
        }
    }
}

pub struct MetadataExtractor<R = LoftyReader> {
    reader: R,
}

impl MetadataExtractor<LoftyReader> {
    pub fn new() -> Self {
        Self {
            reader: LoftyReader,
        }
    }
}

impl Default for MetadataExtractor<LoftyReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TagReader> MetadataExtractor<R> {
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Parse the audio-typed subset of `files` concurrently.
    ///
    /// The result has the same order as the audio inputs, whatever order the
    /// individual parses finish in.
    pub fn parse_batch(&self, files: &[FileResource]) -> Vec<TrackDraft> {
        let audio: Vec<(usize, &FileResource)> =
            files.iter().filter(|f| f.is_audio()).enumerate().collect();

        let mut drafts: Vec<(usize, TrackDraft)> = audio
            .into_par_iter()
            .map(|(i, file)| (i, self.parse_one(file)))
            .collect();

        drafts.sort_unstable_by_key(|(i, _)| *i);
        drafts.into_iter().map(|(_, d)| d).collect()
    }

    /// Parse `files` and hand every result to `resources`, which mints the handles.
    pub fn extract_batch(
        &self,
        files: &[FileResource],
        resources: &mut ResourceManager,
    ) -> Vec<Track> {
        let drafts = self.parse_batch(files);
        debug!(count = drafts.len(), "extracted track batch");
        drafts.into_iter().map(|d| resources.adopt(d)).collect()
    }

    fn parse_one(&self, file: &FileResource) -> TrackDraft {
        match self.reader.read(&file.path) {
            Ok(raw) => TrackDraft::from_tags(file.clone(), raw),
            Err(e) => {
                warn!(
                    path = %file.path.display(),
                    error = %e,
                    "tag extraction failed, using fallbacks"
                );
                TrackDraft::fallback(file.clone())
            }
        }
    }
}

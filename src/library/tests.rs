use super::*;
use super::extract::non_blank;
use crate::error::ExtractionError;
use crate::resources::{CoverArt, ResourceManager};
use std::borrow::Cow;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Reader scripted by file stem: "slow*" sleeps, "broken*" fails, "tagged*" has tags.
struct ScriptedReader;

impl TagReader for ScriptedReader {
    fn read(&self, path: &Path) -> Result<RawTags, ExtractionError> {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if stem.starts_with("slow") {
            thread::sleep(Duration::from_millis(150));
        }
        if stem.starts_with("broken") {
            return Err(std::io::Error::other("unreadable").into());
        }
        if stem.starts_with("tagged") {
            return Ok(RawTags {
                title: Some("Real Title".into()),
                artist: Some("Real Artist".into()),
                album: Some("Real Album".into()),
                cover: Some(CoverArt {
                    mime: Some("image/png".into()),
                    data: vec![1, 2, 3],
                }),
                duration: Some(Duration::from_secs(180)),
            });
        }
        Ok(RawTags::default())
    }
}

fn audio(name: &str) -> FileResource {
    FileResource::new(format!("/music/{name}"), Some("audio/mpeg"))
}

#[test]
fn parse_batch_keeps_input_order_regardless_of_completion_order() {
    let extractor = MetadataExtractor::with_reader(ScriptedReader);
    let files = vec![audio("slow-b.mp3"), audio("a.mp3"), audio("c.mp3")];

    let drafts = extractor.parse_batch(&files);
    let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["slow-b", "a", "c"]);
}

#[test]
fn parse_batch_skips_non_audio_entries() {
    let extractor = MetadataExtractor::with_reader(ScriptedReader);
    let files = vec![
        FileResource::new("/music/cover.jpg", Some("image/jpeg")),
        audio("one.mp3"),
        FileResource::new("/music/readme", None),
        audio("two.mp3"),
    ];

    let drafts = extractor.parse_batch(&files);
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].file.path, Path::new("/music/one.mp3"));
    assert_eq!(drafts[1].file.path, Path::new("/music/two.mp3"));
}

#[test]
fn failed_parse_uses_fallbacks_without_affecting_neighbours() {
    let extractor = MetadataExtractor::with_reader(ScriptedReader);
    let files = vec![audio("broken.mp3"), audio("tagged.mp3")];

    let drafts = extractor.parse_batch(&files);
    assert_eq!(drafts[0].title, "broken");
    assert_eq!(drafts[0].artist, UNKNOWN_ARTIST);
    assert_eq!(drafts[0].album, UNKNOWN_ALBUM);
    assert!(drafts[0].cover.is_none());

    assert_eq!(drafts[1].title, "Real Title");
    assert_eq!(drafts[1].artist, "Real Artist");
    assert_eq!(drafts[1].album, "Real Album");
    assert_eq!(drafts[1].duration, Some(Duration::from_secs(180)));
}

#[test]
fn missing_fields_fall_back_individually() {
    let extractor = MetadataExtractor::with_reader(ScriptedReader);
    let drafts = extractor.parse_batch(&[audio("plain.flac")]);
    assert_eq!(drafts[0].title, "plain");
    assert_eq!(drafts[0].artist, UNKNOWN_ARTIST);
    assert_eq!(drafts[0].album, UNKNOWN_ALBUM);
}

#[test]
fn extract_batch_mints_distinct_handles_and_covers_only_when_present() {
    let extractor = MetadataExtractor::with_reader(ScriptedReader);
    let mut resources = ResourceManager::new();
    let files = vec![audio("tagged.mp3"), audio("plain.mp3")];

    let tracks = extractor.extract_batch(&files, &mut resources);
    assert_eq!(tracks.len(), 2);
    assert_ne!(tracks[0].id, tracks[1].id);
    assert_ne!(tracks[0].source, tracks[1].source);

    let cover = tracks[0].cover.expect("tagged file has embedded art");
    assert_eq!(resources.cover(cover).map(|c| c.data.len()), Some(3));
    assert!(tracks[1].cover.is_none());

    // source + cover for the first, source only for the second
    assert_eq!(resources.live_count(), 3);
}

#[test]
fn garbage_file_gets_filename_title_and_unknown_artist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.mp3");
    std::fs::write(&path, b"not a real mp3").unwrap();

    let extractor = MetadataExtractor::new();
    let drafts = extractor.parse_batch(&[FileResource::new(&path, Some("audio/mpeg"))]);
    assert_eq!(drafts[0].title, "fake");
    assert_eq!(drafts[0].artist, UNKNOWN_ARTIST);
}

#[test]
fn tidy_strips_noise_brackets_digit_runs_and_underscores() {
    let tidier = TitleTidier::default();
    assert_eq!(tidier.tidy("Song_Name [MUZCHA.NET]"), "Song Name");
    assert_eq!(tidier.tidy("Artist - Track 20240101"), "Artist - Track");
    assert_eq!(tidier.tidy("Intro [ ]  Outro"), "Intro Outro");
    assert_eq!(tidier.tidy("Track 123"), "Track 123");
}

#[test]
fn tidy_never_returns_empty_title() {
    let tidier = TitleTidier::new(&["noise".to_string()]);
    assert_eq!(tidier.tidy("12345"), "12345");
    assert_eq!(tidier.tidy("NOISE"), "NOISE");
}

#[test]
fn tidy_without_noise_list_only_normalizes() {
    let tidier = TitleTidier::new(&[]);
    assert_eq!(tidier.tidy("a__b   c"), "a b c");
    assert_eq!(tidier.tidy("[muzcha.net] x"), "[muzcha.net] x");
}

#[test]
fn tag_values_are_kept_verbatim_unless_blank() {
    assert_eq!(
        non_blank(Some(Cow::Borrowed("  Intro (Live) "))),
        Some("  Intro (Live) ".to_string())
    );
    assert_eq!(non_blank(Some(Cow::Borrowed(" \t "))), None);
    assert_eq!(non_blank(Some(Cow::Borrowed(""))), None);
    assert_eq!(non_blank(None), None);
}

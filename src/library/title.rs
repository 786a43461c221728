use std::sync::LazyLock;

use regex::Regex;

static EMPTY_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*\]").expect("valid empty-bracket pattern"));
static LONG_DIGIT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4,}").expect("valid digit-run pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Cleans up titles for display: download-site tags, catalogue numbers, underscores.
///
/// The stored track title is never changed; this is only applied when rendering.
#[derive(Debug, Clone)]
pub struct TitleTidier {
    noise: Option<Regex>,
}

impl TitleTidier {
    /// Build a tidier that strips each of `noise` case-insensitively.
    pub fn new(noise: &[String]) -> Self {
        let alternatives: Vec<String> = noise
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();

        let noise = if alternatives.is_empty() {
            None
        } else {
            Regex::new(&format!("(?i){}", alternatives.join("|"))).ok()
        };

        Self { noise }
    }

    pub fn tidy(&self, title: &str) -> String {
        let mut out = match &self.noise {
            Some(re) => re.replace_all(title, "").into_owned(),
            None => title.to_string(),
        };
        out = EMPTY_BRACKETS.replace_all(&out, "").into_owned();
        out = LONG_DIGIT_RUNS.replace_all(out.trim(), "").into_owned();
        out = out.replace('_', " ");
        let out = WHITESPACE.replace_all(&out, " ").trim().to_string();

        // Never tidy a title away entirely.
        if out.is_empty() {
            title.trim().to_string()
        } else {
            out
        }
    }
}

impl Default for TitleTidier {
    fn default() -> Self {
        Self::new(&crate::config::LibrarySettings::default().title_noise)
    }
}

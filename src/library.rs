//! Library: file resources from a folder, tag extraction and title tidying.

mod extract;
mod files;
mod model;
mod title;

pub use extract::{LoftyReader, MetadataExtractor, RawTags, TagReader};
pub use files::{audio_only, collect_files, guess_mime};
pub use model::*;
pub use title::TitleTidier;

#[cfg(test)]
mod tests;

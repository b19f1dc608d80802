//! Media asset model.
//!
//! The public root holds two asset directories:
//! - `videos/` - demo reels, served as `video/mp4`
//! - `audio/` - voice and podcast samples, `.mp3` or `.aac`
//!
//! [`MediaRoot`] locates them, [`MediaStore`] serves them as cached data URLs.
//! Byte-range streaming lives in [`crate::streaming`] and only shares the
//! resolved directories with the store.

mod reader;
pub mod root;
mod store;

pub use reader::{FsReader, MediaReader};
pub use root::{default_strategies, Candidate, MediaRoot, RootStrategy};
pub use store::{MediaCatalog, MediaKey, MediaStore};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "aac"];

/// The two kinds of media the site embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Both kinds, in catalog order.
    pub const ALL: [MediaKind; 2] = [MediaKind::Video, MediaKind::Audio];

    /// Lowercase name used in cache keys and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Subdirectory of the public root holding this kind.
    pub fn subdir(self) -> &'static str {
        match self {
            MediaKind::Video => "videos",
            MediaKind::Audio => "audio",
        }
    }

    /// Capitalized name for user-facing error messages.
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
        }
    }

    /// Whether `filename` carries an extension listed for this kind.
    pub fn accepts(self, filename: &str) -> bool {
        let Some(ext) = extension(filename) else {
            return false;
        };
        let allowed = match self {
            MediaKind::Video => VIDEO_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
        };
        allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
    }

    /// MIME type served for `filename`.
    ///
    /// Every video is advertised as `video/mp4`. Audio is `audio/mpeg` for
    /// `.mp3` and `audio/aac` for anything else.
    pub fn mime_type(self, filename: &str) -> &'static str {
        match self {
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => match extension(filename) {
                Some(ext) if ext.eq_ignore_ascii_case("mp3") => "audio/mpeg",
                _ => "audio/aac",
            },
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_owned)
}

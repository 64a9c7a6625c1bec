//! Media format selector for lecture downloads.

use std::fmt;

/// Which rendition of a lecture to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFormat {
    #[default]
    Video,
    Iphone,
    Audio,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 3] = [MediaFormat::Video, MediaFormat::Iphone, MediaFormat::Audio];

    /// Parses a format name; anything unrecognized falls back to `Video`.
    pub fn from_name_lossy(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "iphone" => MediaFormat::Iphone,
            "audio" => MediaFormat::Audio,
            "video" => MediaFormat::Video,
            other => {
                tracing::debug!(format = other, "unknown format, using video");
                MediaFormat::Video
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaFormat::Video => "video",
            MediaFormat::Iphone => "iphone",
            MediaFormat::Audio => "audio",
        }
    }

    /// Link label on didattica lecture pages.
    pub(crate) fn didattica_marker(self) -> &'static str {
        match self {
            MediaFormat::Video => "Video",
            MediaFormat::Iphone => "iPhone",
            MediaFormat::Audio => "Audio",
        }
    }

    /// Link marker on elearning lecture pages.
    pub(crate) fn elearning_marker(self) -> &'static str {
        match self {
            MediaFormat::Video => "video1",
            MediaFormat::Iphone => "video2",
            MediaFormat::Audio => "video3",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Local filename derivation for downloads.
//!
//! The name comes from the last path segment of the final (post-redirect)
//! URL, sanitized for Linux filesystems.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Default filename when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "lecture.bin";

/// Derives a safe filename for saving a download from its final URL.
///
/// # Examples
///
/// - `derive_filename("https://video.polito.it/2023/lez01.mp4")` → `"lez01.mp4"`
/// - `derive_filename("https://video.polito.it/")` → `"lecture.bin"`
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

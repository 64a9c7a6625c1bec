//! Page patterns for the elearning.polito.it video gadget layout.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use super::format::MediaFormat;
use super::{capture_all, link_under};

/// Directory both lecture links and format links are relative to.
pub const GADGET_DIR: &str = "/gadgets/video/";

fn lecture_link() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"href='(template_video\.php\?[^']*)").expect("valid lecture link regex")
    })
}

fn format_pattern(format: MediaFormat) -> &'static Regex {
    static VIDEO: OnceLock<Regex> = OnceLock::new();
    static IPHONE: OnceLock<Regex> = OnceLock::new();
    static AUDIO: OnceLock<Regex> = OnceLock::new();
    let cell = match format {
        MediaFormat::Video => &VIDEO,
        MediaFormat::Iphone => &IPHONE,
        MediaFormat::Audio => &AUDIO,
    };
    cell.get_or_init(|| {
        Regex::new(&format!(
            r#"href="(download\.php[^"]*)[^\n]*?{}"#,
            regex::escape(format.elearning_marker())
        ))
        .expect("valid format link regex")
    })
}

pub fn lecture_urls(html: &str, page: &Url) -> Vec<String> {
    capture_all(lecture_link(), html)
        .into_iter()
        .filter_map(|href| link_under(page, GADGET_DIR, href))
        .collect()
}

pub fn format_link(html: &str, format: MediaFormat, page: &Url) -> Option<String> {
    let href = format_pattern(format).captures(html)?.get(1)?.as_str();
    link_under(page, GADGET_DIR, href)
}

//! Page patterns for the didattica.polito.it video lesson layout.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use super::format::MediaFormat;
use super::syllabus::{Syllabus, SyllabusLecture};
use super::{capture_all, link_under, unescape};

/// Directory the relative lecture links of a course listing live in.
pub const LECTURE_DIR: &str = "/pls/portal30/";

fn lecture_link() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"href="(sviluppo\.videolezioni\.vis[^"]*lez=\w*)">"#)
            .expect("valid lecture link regex")
    })
}

fn lecture_title() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"href="sviluppo\.videolezioni\.vis[^"]*lez=\w*">([^<]*)</a>"#)
            .expect("valid lecture title regex")
    })
}

fn course_title() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<div class="h2 text-primary">([^<]*)"#).expect("valid course regex")
    })
}

fn professor() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<h3>([^<]*)").expect("valid professor regex"))
}

fn lecture_date() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<span class="small">[^0-9]*([^<]*)"#).expect("valid date regex")
    })
}

fn topic() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"argoLink[^>]*>([^<]*)<").expect("valid topic regex"))
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
            r#"href="([^"]*)"[^\n]*?{}"#,
            regex::escape(format.didattica_marker())
        ))
        .expect("valid format link regex")
    })
}

/// Absolute lecture page URLs of the course listing served at `page`, in page order.
pub fn lecture_urls(html: &str, page: &Url) -> Vec<String> {
    capture_all(lecture_link(), html)
        .into_iter()
        .filter_map(|href| link_under(page, LECTURE_DIR, href))
        .collect()
}

/// The format link on the lecture page served at `page`, made absolute.
pub fn format_link(html: &str, format: MediaFormat, page: &Url) -> Option<String> {
    let href = format_pattern(format).captures(html)?.get(1)?.as_str();
    link_under(page, "/", href)
}

/// Course header plus one entry per `<li class="h5">` lecture block.
pub fn syllabus(html: &str) -> Option<Syllabus> {
    let course = course_title().captures(html)?.get(1)?.as_str();
    let professor = professor().captures(html)?.get(1)?.as_str();

    let lectures = html
        .split(r#"<li class="h5">"#)
        .skip(1)
        .filter_map(|block| {
            let title = lecture_title().captures(block)?.get(1)?.as_str();
            let date = lecture_date()
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or("");
            let topics = capture_all(topic(), block)
                .into_iter()
                .map(unescape)
                .collect();
            Some(SyllabusLecture {
                title: unescape(title),
                date: unescape(date).trim().to_string(),
                topics,
            })
        })
        .collect();

    Some(Syllabus {
        course: unescape(course).trim().to_string(),
        professor: unescape(professor).trim().to_string(),
        lectures,
    })
}

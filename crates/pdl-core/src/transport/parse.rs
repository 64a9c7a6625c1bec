//! Parse HTTP response header lines into ResponseHead.

/// Headers of the last response in a (possibly redirected) exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the `HTTP/x yyy` line, if one was seen.
    pub status: Option<u32>,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Location` value, present on redirects.
    pub location: Option<String>,
    /// True if server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
}

/// Status code of an `HTTP/1.1 206 Partial Content` style line.
pub fn parse_status_line(line: &str) -> Option<u32> {
    let line = line.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Parse collected header lines into ResponseHead.
///
/// curl reports headers of every hop when following redirects; only the block
/// after the last status line describes the final response.
pub fn parse_head(lines: &[String]) -> ResponseHead {
    let start = lines
        .iter()
        .rposition(|l| parse_status_line(l).is_some())
        .unwrap_or(0);

    let mut head = ResponseHead::default();
    for line in &lines[start..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(code) = parse_status_line(line) {
            head.status = Some(code);
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    head.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("location") {
                head.location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("accept-ranges") {
                head.accept_ranges = value.eq_ignore_ascii_case("bytes");
            }
        }
    }
    head
}

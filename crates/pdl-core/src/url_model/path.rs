//! Filename extraction from URL path.

/// Extracts the last path segment (percent-decoded) from a URL.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?;
    // form_urlencoded is the percent-decoder `url` exposes; keep literal '+' and '&'.
    let query = format!("x={}", segment.replace('+', "%2B").replace('&', "%26"));
    let decoded: String = url::form_urlencoded::parse(query.as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| segment.to_string());
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}

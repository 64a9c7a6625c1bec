//! Just enough HTTP/1.1 for the fixtures: one request per connection, then close.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded `application/x-www-form-urlencoded` body.
    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(&self.body).into_owned().collect()
    }

    pub fn has_cookie(&self, pair: &str) -> bool {
        self.header("cookie")
            .map(|v| v.split(';').any(|c| c.trim() == pair))
            .unwrap_or(false)
    }

    /// `Range: bytes=start-end` as (start, optional inclusive end).
    pub fn range(&self) -> Option<(u64, Option<u64>)> {
        let value = self.header("range")?.trim();
        let spec = value.strip_prefix("bytes=")?;
        let (a, b) = spec.split_once('-')?;
        let start = a.trim().parse().ok()?;
        let end = b.trim();
        let end = if end.is_empty() {
            None
        } else {
            Some(end.parse().ok()?)
        };
        Some((start, end))
    }
}

/// Reads one request, including a `Content-Length` body.
pub fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
    };
    let head = std::str::from_utf8(&buf[..head_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let target = first.next()?.to_string();
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), q.to_string()),
        None => (target, String::new()),
    };
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let len: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < len {
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }
    Some(Request {
        method,
        path,
        query,
        headers,
        body,
    })
}

/// Writes a full response. `Content-Length` defaults to the body length unless
/// present in `headers`; HEAD callers pass an empty body with their own length.
pub fn respond(stream: &mut TcpStream, status: &str, headers: &[(&str, String)], body: &[u8]) {
    let mut out = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
    if !headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("content-length"))
    {
        out.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    for (k, v) in headers {
        out.push_str(&format!("{}: {}\r\n", k, v));
    }
    out.push_str("\r\n");
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

pub fn html(stream: &mut TcpStream, body: &str, extra: &[(&str, String)]) {
    let mut headers = vec![("Content-Type", "text/html; charset=utf-8".to_string())];
    headers.extend(extra.iter().cloned());
    respond(stream, "200 OK", &headers, body.as_bytes());
}

pub fn redirect(stream: &mut TcpStream, location: &str, extra: &[(&str, String)]) {
    let mut headers = vec![("Location", location.to_string())];
    headers.extend(extra.iter().cloned());
    respond(stream, "302 Found", &headers, b"");
}

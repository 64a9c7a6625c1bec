//! HTTP server serving one static body with HEAD and Range support.
//!
//! Every path serves the same body, so the path only decides the derived
//! filename. `/redirect/<name>` answers 302 to `/files/<name>`. Requests are
//! logged for assertions on what a transfer actually asked for.

use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use super::http::{self, Request};

#[derive(Debug, Clone)]
pub struct RangeServerOptions {
    /// If false, HEAD returns 405.
    pub head_allowed: bool,
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// When set, requests without this `name=value` cookie get 403.
    pub required_cookie: Option<String>,
    /// Length HEAD advertises instead of the real body length.
    pub declared_len: Option<u64>,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            head_allowed: true,
            support_ranges: true,
            required_cookie: None,
            declared_len: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logged {
    pub method: String,
    pub path: String,
    pub range: Option<String>,
}

#[derive(Clone)]
pub struct RangeServer {
    pub base: String,
    log: Arc<Mutex<Vec<Logged>>>,
}

impl RangeServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> Vec<Logged> {
        self.log.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<Logged> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "GET")
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            let log = Arc::clone(&server_log);
            thread::spawn(move || handle(stream, &body, &opts, &log));
        }
    });
    RangeServer {
        base: format!("http://127.0.0.1:{}/", port),
        log,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: &RangeServerOptions, log: &Mutex<Vec<Logged>>) {
    let Some(req) = http::read_request(&mut stream) else {
        return;
    };
    log.lock().unwrap().push(Logged {
        method: req.method.clone(),
        path: req.path.clone(),
        range: req.header("range").map(str::to_string),
    });
    serve(&mut stream, &req, body, opts);
}

/// Answers `req` from `body`; also used by the portal fixture for its media route.
pub fn serve(stream: &mut TcpStream, req: &Request, body: &[u8], opts: &RangeServerOptions) {
    if let Some(cookie) = &opts.required_cookie {
        if !req.has_cookie(cookie) {
            http::respond(stream, "403 Forbidden", &[], b"login required");
            return;
        }
    }
    if let Some(name) = req.path.strip_prefix("/redirect/") {
        http::redirect(stream, &format!("/files/{}", name), &[]);
        return;
    }
    let total = body.len() as u64;
    let accept = if opts.support_ranges {
        vec![("Accept-Ranges", "bytes".to_string())]
    } else {
        Vec::new()
    };
    match req.method.as_str() {
        "HEAD" => {
            if !opts.head_allowed {
                http::respond(stream, "405 Method Not Allowed", &[], b"");
                return;
            }
            let mut headers = accept;
            let declared = opts.declared_len.unwrap_or(total);
            headers.push(("Content-Length", declared.to_string()));
            http::respond(stream, "200 OK", &headers, b"");
        }
        "GET" => {
            let range = if opts.support_ranges { req.range() } else { None };
            let Some((start, end)) = range else {
                http::respond(stream, "200 OK", &accept, body);
                return;
            };
            let last = total.saturating_sub(1);
            let end = end.unwrap_or(last).min(last);
            if total == 0 || start > end {
                let headers = vec![("Content-Range", format!("bytes */{}", total))];
                http::respond(stream, "416 Range Not Satisfiable", &headers, b"");
                return;
            }
            let slice = &body[start as usize..=end as usize];
            let mut headers = accept;
            headers.push((
                "Content-Range",
                format!("bytes {}-{}/{}", start, end, total),
            ));
            http::respond(stream, "206 Partial Content", &headers, slice);
        }
        _ => http::respond(stream, "405 Method Not Allowed", &[], b""),
    }
}

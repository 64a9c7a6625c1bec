//! Mock didattica course served from one port.
//!
//! Route layout:
//!   GET  /pls/portal30/course                            listing of every lecture
//!   GET  /pls/portal30/sviluppo.videolezioni.vis?lez=N   lecture page with the three format links
//!   GET  /pls/portal30/sviluppo.videolezioni.download    302 to /media/<file of lecture N>
//!   *    /media/*                                        range-capable body

use std::collections::HashMap;
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use super::http::{self, Request};
use super::range_server::{self, Logged, RangeServerOptions};

pub const COURSE_PATH: &str = "pls/portal30/course";

pub struct CourseServer {
    pub base: String,
    log: Arc<Mutex<Vec<Logged>>>,
}

impl CourseServer {
    pub fn course_url(&self) -> String {
        format!("{}{}", self.base, COURSE_PATH)
    }

    /// Requests that reached the media route.
    pub fn media_requests(&self) -> Vec<Logged> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.starts_with("/media/"))
            .cloned()
            .collect()
    }
}

/// Lecture `N` (1-based) downloads as `/media/<files[N-1]>`; every file has `body`.
pub fn start(files: Vec<String>, body: Vec<u8>) -> CourseServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files = Arc::new(files);
    let body = Arc::new(body);
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let body = Arc::clone(&body);
            let log = Arc::clone(&server_log);
            thread::spawn(move || {
                let Some(req) = http::read_request(&mut stream) else {
                    return;
                };
                log.lock().unwrap().push(Logged {
                    method: req.method.clone(),
                    path: req.path.clone(),
                    range: req.header("range").map(str::to_string),
                });
                route(&mut stream, &req, &files, &body);
            });
        }
    });
    CourseServer {
        base: format!("http://127.0.0.1:{}/", port),
        log,
    }
}

fn lecture_number(req: &Request) -> Option<usize> {
    let query: HashMap<String, String> = url::form_urlencoded::parse(req.query.as_bytes())
        .into_owned()
        .collect();
    query.get("lez")?.parse().ok()
}

fn listing(count: usize) -> String {
    let mut html = String::from(
        "<div class=\"h2 text-primary\">Fisica I</div>\n<h3>Anna Bianchi</h3>\n<ul>\n",
    );
    for n in 1..=count {
        html.push_str(&format!(
            "<li class=\"h5\"><a href=\"sviluppo.videolezioni.vis?cor=77&amp;lez={}\">Lezione {}</a></li>\n",
            n, n
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn lecture_page(n: usize) -> String {
    format!(
        "<ul class=\"download\">\n\
         <li><a href=\"/pls/portal30/sviluppo.videolezioni.download?lez={n}&amp;t=v\">Scarica Video</a></li>\n\
         <li><a href=\"/pls/portal30/sviluppo.videolezioni.download?lez={n}&amp;t=i\">Scarica iPhone</a></li>\n\
         <li><a href=\"/pls/portal30/sviluppo.videolezioni.download?lez={n}&amp;t=a\">Scarica Audio</a></li>\n\
         </ul>\n"
    )
}

fn route(s: &mut TcpStream, req: &Request, files: &[String], body: &[u8]) {
    let file = lecture_number(req)
        .filter(|n| (1..=files.len()).contains(n))
        .map(|n| (n, &files[n - 1]));
    match req.path.as_str() {
        "/pls/portal30/course" => http::html(s, &listing(files.len()), &[]),
        "/pls/portal30/sviluppo.videolezioni.vis" => match file {
            Some((n, _)) => http::html(s, &lecture_page(n), &[]),
            None => http::respond(s, "404 Not Found", &[], b"no such lecture"),
        },
        "/pls/portal30/sviluppo.videolezioni.download" => match file {
            Some((_, name)) => http::redirect(s, &format!("/media/{}", name), &[]),
            None => http::respond(s, "404 Not Found", &[], b"no such lecture"),
        },
        path if path.starts_with("/media/") => {
            range_server::serve(s, req, body, &RangeServerOptions::default())
        }
        _ => http::respond(s, "404 Not Found", &[], b"not found"),
    }
}

//! Mock identity provider and portal for the two-round SAML login.
//!
//! Route layout (all on one port):
//!   GET  /idp/login               sets the IdP cookie
//!   POST /idp/authn               relay pair 1, or the login form again on bad credentials
//!   POST /sp/SAML2/POST           checks pair 1, 302 to /sp/home
//!   POST /login/ShibLogin.php     relay pair 2
//!   POST /login/SAML2/POST        checks pair 2, sets the portal cookie, 302 to the student home
//!   GET  /media/*                 range-capable body behind the portal cookie

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use pdl_core::auth::AuthEndpoints;

use super::http::{self, Request};
use super::range_server::{self, RangeServerOptions};

pub const IDP_COOKIE: &str = "_idp_session=idp42";
pub const SP_COOKIE: &str = "_shibsession_www=www42";
pub const PORTAL_COOKIE: &str = "_shibsession_didattica=granted";

const RELAY_1: &str = "cookie:1700000000_ab12";
const RESPONSE_1: &str = "PHNhbWxwOlJlc3BvbnNlPjE8L3NhbWxwOlJlc3BvbnNlPg==";
const RELAY_2: &str = "ss:mem:9f8e7d";
const RESPONSE_2: &str = "PHNhbWxwOlJlc3BvbnNlPjI8L3NhbWxwOlJlc3BvbnNlPg==";

#[derive(Debug, Clone)]
pub struct PortalServerOptions {
    pub username: String,
    pub password: String,
    /// Leave SAMLResponse out of the second relay page.
    pub omit_second_response: bool,
    /// Served under `/media/`.
    pub media: Vec<u8>,
}

impl Default for PortalServerOptions {
    fn default() -> Self {
        Self {
            username: "s123456".to_string(),
            password: "correct horse".to_string(),
            omit_second_response: false,
            media: (0u8..=250).cycle().take(48 * 1024).collect(),
        }
    }
}

pub struct PortalServer {
    pub base: String,
}

impl PortalServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn endpoints(&self) -> AuthEndpoints {
        AuthEndpoints {
            idp_login: self.url("/idp/login"),
            idp_authn: self.url("/idp/authn"),
            sp_assertion: self.url("/sp/SAML2/POST"),
            session_login: self.url("/login/ShibLogin.php"),
            session_assertion: self.url("/login/SAML2/POST"),
            student_home: self.url("/portal/home/Studente"),
        }
    }
}

pub fn start(opts: PortalServerOptions) -> PortalServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &opts));
        }
    });
    PortalServer {
        base: format!("http://127.0.0.1:{}", port),
    }
}

fn relay_page(action: &str, relay: &str, response: Option<&str>) -> String {
    let mut page = format!(
        "<html><body onload=\"document.forms[0].submit()\">\n\
         <form action=\"{}\" method=\"post\">\n\
         <input type=\"hidden\" name=\"RelayState\" value=\"{}\"/>\n",
        action,
        relay.replace(':', "&#x3a;")
    );
    if let Some(response) = response {
        page.push_str(&format!(
            "<input type=\"hidden\" name=\"SAMLResponse\" value=\"{}\"/>\n",
            response
        ));
    }
    page.push_str("</form></body></html>\n");
    page
}

const LOGIN_FORM: &str = "<html><body><form action=\"/idp/authn\" method=\"post\">\n\
    <input type=\"text\" name=\"j_username\"/>\n\
    <input type=\"password\" name=\"j_password\"/>\n\
    <p class=\"error\">Credenziali non valide</p>\n\
    </form></body></html>\n";

fn tokens_match(req: &Request, relay: &str, response: &str) -> bool {
    let form = req.form();
    form.get("RelayState").map(String::as_str) == Some(relay)
        && form.get("SAMLResponse").map(String::as_str) == Some(response)
}

fn cookie(pair: &str) -> (&'static str, String) {
    ("Set-Cookie", format!("{}; Path=/", pair))
}

fn handle(mut stream: TcpStream, opts: &PortalServerOptions) {
    let Some(req) = http::read_request(&mut stream) else {
        return;
    };
    let s = &mut stream;
    match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/idp/login") => http::html(s, LOGIN_FORM, &[cookie(IDP_COOKIE)]),
        ("POST", "/idp/authn") => {
            let form = req.form();
            let ok = req.has_cookie(IDP_COOKIE)
                && form.get("j_username") == Some(&opts.username)
                && form.get("j_password") == Some(&opts.password);
            if ok {
                http::html(s, &relay_page("/sp/SAML2/POST", RELAY_1, Some(RESPONSE_1)), &[]);
            } else {
                http::html(s, LOGIN_FORM, &[]);
            }
        }
        ("POST", "/sp/SAML2/POST") => {
            if tokens_match(&req, RELAY_1, RESPONSE_1) {
                http::redirect(s, "/sp/home", &[cookie(SP_COOKIE)]);
            } else {
                http::redirect(s, "/sp/error", &[]);
            }
        }
        ("GET", "/sp/home") | ("GET", "/sp/error") | ("GET", "/portal/error") => {
            http::html(s, "<html><body>ok</body></html>", &[])
        }
        ("POST", "/login/ShibLogin.php") => {
            if !req.has_cookie(IDP_COOKIE) {
                http::redirect(s, "/idp/login", &[]);
                return;
            }
            let response = (!opts.omit_second_response).then_some(RESPONSE_2);
            http::html(s, &relay_page("/login/SAML2/POST", RELAY_2, response), &[]);
        }
        ("POST", "/login/SAML2/POST") => {
            if tokens_match(&req, RELAY_2, RESPONSE_2) {
                http::redirect(s, "/portal/home/Studente", &[cookie(PORTAL_COOKIE)]);
            } else {
                http::redirect(s, "/portal/error", &[]);
            }
        }
        ("GET", "/portal/home/Studente") => {
            if req.has_cookie(PORTAL_COOKIE) {
                http::html(s, "<html><body>Benvenuto</body></html>", &[]);
            } else {
                http::redirect(s, "/portal/error", &[]);
            }
        }
        (_, path) if path.starts_with("/media/") => {
            let media = RangeServerOptions {
                required_cookie: Some(PORTAL_COOKIE.to_string()),
                ..RangeServerOptions::default()
            };
            range_server::serve(s, &req, &opts.media, &media);
        }
        _ => http::respond(s, "404 Not Found", &[], b"not found"),
    }
}

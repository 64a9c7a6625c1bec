pub mod config;
pub mod logging;

pub mod auth;
pub mod batch;
pub mod control;
pub mod downloader;
pub mod error;
pub mod portal;
pub mod session;
pub mod transport;
pub mod url_model;

//! HTTP API for the video discovery pipeline

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{start_http_server, AppState};

//! Infrastructure layer for kiosk-dashboard.
//!
//! # Responsibilities
//!
//! - Binding the HTTP listener and routing requests (`http_server`)
//! - Rendering HTML pages (`views`)
//! - Running `systemctl` and `reboot` (`system_control`)
//! - Mapping application errors to HTTP status codes
//!
//! # What does NOT belong here?
//!
//! - Deciding what a form submission does to the document (application layer)
//! - CLI parsing (that is done in `main.rs`)

pub mod http_server;
pub mod system_control;
pub mod views;

pub use http_server::{build_router, run_server, AppState};

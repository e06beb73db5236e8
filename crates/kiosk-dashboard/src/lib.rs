//! kiosk-dashboard library crate.
//!
//! A small local web service that lets an operator edit what a kiosk screen
//! shows, check whether the kiosk is online, and stop or reboot it.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (HTML forms, fetch)
//!         ↕
//! [kiosk-dashboard]
//!   ├── domain/           DashboardConfig
//!   ├── application/      Manage actions, system actions, lock checks
//!   └── infrastructure/
//!         ├── http_server/    axum routes and the serve loop
//!         ├── views/          maud HTML pages
//!         └── system_control/ systemctl / reboot via tokio::process
//!         ↕
//! [kiosk-core]  ConfigStore (config.json), ReachabilityProbe (ping)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `kiosk-core`, and on traits for
//!   anything that touches the operating system.
//! - `infrastructure` depends on every other layer plus `axum` and `maud`.

/// Domain layer: plain configuration types.
pub mod domain;

/// Application layer: what each dashboard action does to the document.
pub mod application;

/// Infrastructure layer: HTTP, HTML, and OS commands.
pub mod infrastructure;

//! Domain layer for kiosk-dashboard.
//!
//! Only the runtime configuration lives here.  The kiosk document itself is a
//! `kiosk-core` type; this crate never redefines it.

pub mod config;

pub use config::DashboardConfig;

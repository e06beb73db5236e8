//! Dashboard configuration types.
//!
//! [`DashboardConfig`] holds every runtime setting.  `main.rs` builds it from
//! CLI arguments and environment variables; tests build it directly or start
//! from [`DashboardConfig::default`].

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use kiosk_core::network::probe::DEFAULT_PROBE_TIMEOUT;
use kiosk_core::storage::config_store::DEFAULT_CONFIG_FILE;
use kiosk_core::ProbeTargets;

/// Port the dashboard listens on by default.
pub const DEFAULT_PORT: u16 = 5000;

/// systemd unit that runs the kiosk browser session.
pub const DEFAULT_SESSION_SERVICE: &str = "kiosk.service";

/// All runtime configuration for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Address and port the HTTP server binds to.
    ///
    /// `0.0.0.0` so the dashboard is reachable from a phone or laptop on the
    /// same LAN; there is no authentication, so do not expose it further.
    pub bind_addr: SocketAddr,

    /// Path of the JSON kiosk document.
    pub config_file: PathBuf,

    /// Addresses probed by `/network-status`.
    pub probe_targets: ProbeTargets,

    /// Timeout for each individual probe.
    pub probe_timeout: Duration,

    /// systemd unit stopped by `/system/stop-session`.
    pub session_service: String,

    /// Prefix system commands with `sudo`.
    pub use_sudo: bool,
}

impl Default for DashboardConfig {
    /// | Field           | Default          |
    /// |-----------------|------------------|
    /// | bind_addr       | `0.0.0.0:5000`   |
    /// | config_file     | `config.json`    |
    /// | probe_targets   | `192.168.1.1`, `1.1.1.1` |
    /// | probe_timeout   | 300 ms           |
    /// | session_service | `kiosk.service`  |
    /// | use_sudo        | `true`           |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            probe_targets: ProbeTargets::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            session_service: DEFAULT_SESSION_SERVICE.to_string(),
            use_sudo: true,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Kiosk dashboard entry point.
//!
//! Serves the kiosk display page and the management dashboard over HTTP.
//!
//! # Usage
//!
//! ```text
//! kiosk-dashboard [OPTIONS]
//!
//! Options:
//!   --bind <ADDR>              Address to listen on [default: 0.0.0.0]
//!   --port <PORT>              HTTP port [default: 5000]
//!   --config-file <PATH>       Kiosk JSON document [default: config.json]
//!   --gateway <IP>             Local gateway to probe [default: 192.168.1.1]
//!   --internet <IP>            Public address to probe [default: 1.1.1.1]
//!   --probe-timeout-ms <MS>    Per-probe timeout [default: 300]
//!   --session-service <UNIT>   systemd unit for the kiosk session [default: kiosk.service]
//!   --no-sudo                  Run system commands without sudo
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Default         |
//! |--------------------------|-----------------|
//! | `KIOSK_BIND`             | `0.0.0.0`       |
//! | `KIOSK_PORT`             | `5000`          |
//! | `KIOSK_CONFIG_FILE`      | `config.json`   |
//! | `KIOSK_GATEWAY`          | `192.168.1.1`   |
//! | `KIOSK_INTERNET`         | `1.1.1.1`       |
//! | `KIOSK_PROBE_TIMEOUT_MS` | `300`           |
//! | `KIOSK_SESSION_SERVICE`  | `kiosk.service` |
//! | `KIOSK_NO_SUDO`          | unset           |
//!
//! CLI args take precedence when both are present.  Log level comes from
//! `RUST_LOG` (default `info`).

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kiosk_core::ProbeTargets;
use kiosk_dashboard::domain::DashboardConfig;
use kiosk_dashboard::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Local web dashboard for a kiosk display.
#[derive(Debug, Parser)]
#[command(
    name = "kiosk-dashboard",
    about = "Local web dashboard for managing a kiosk display configuration",
    version
)]
struct Cli {
    /// IP address to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0", env = "KIOSK_BIND")]
    bind: String,

    /// HTTP port.
    #[arg(long, default_value_t = 5000, env = "KIOSK_PORT")]
    port: u16,

    /// Path of the kiosk JSON document.  Created with defaults if missing.
    #[arg(long, default_value = "config.json", env = "KIOSK_CONFIG_FILE")]
    config_file: PathBuf,

    /// Local gateway address probed by /network-status.
    #[arg(long, default_value = "192.168.1.1", env = "KIOSK_GATEWAY")]
    gateway: String,

    /// Public address probed by /network-status.
    #[arg(long, default_value = "1.1.1.1", env = "KIOSK_INTERNET")]
    internet: String,

    /// Timeout for each individual probe, in milliseconds.
    #[arg(long, default_value_t = 300, env = "KIOSK_PROBE_TIMEOUT_MS")]
    probe_timeout_ms: u64,

    /// systemd unit stopped by /system/stop-session.
    #[arg(long, default_value = "kiosk.service", env = "KIOSK_SESSION_SERVICE")]
    session_service: String,

    /// Run systemctl and reboot directly instead of through sudo.
    #[arg(long, env = "KIOSK_NO_SUDO")]
    no_sudo: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`DashboardConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind`, `--gateway`, or `--internet` is not a
    /// valid IP address.
    fn into_dashboard_config(self) -> anyhow::Result<DashboardConfig> {
        let bind_ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: '{}'", self.bind))?;
        let gateway: IpAddr = self
            .gateway
            .parse()
            .with_context(|| format!("invalid gateway address: '{}'", self.gateway))?;
        let internet: IpAddr = self
            .internet
            .parse()
            .with_context(|| format!("invalid internet address: '{}'", self.internet))?;

        Ok(DashboardConfig {
            bind_addr: SocketAddr::new(bind_ip, self.port),
            config_file: self.config_file,
            probe_targets: ProbeTargets { gateway, internet },
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            session_service: self.session_service,
            use_sudo: !self.no_sudo,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_dashboard_config()?;

    info!(
        "kiosk dashboard starting: http={}, config={}, probes={}/{}",
        config.bind_addr,
        config.config_file.display(),
        config.probe_targets.gateway,
        config.probe_targets.internet
    );

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, initiating graceful shutdown"),
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    };

    run_server(config, shutdown).await?;

    info!("kiosk dashboard stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Concurrent reachability probe.
//!
//! [`ReachabilityProbe::check`] spawns one Tokio task per target and waits for
//! both.  Neither probe is cancelled when the other finishes first, so the
//! total latency is roughly one probe timeout rather than the sum of two.
//!
//! # Testability
//!
//! The actual network call sits behind the [`Prober`] trait.  Production code
//! uses [`PingProber`]; tests inject doubles that answer instantly, sleep, or
//! panic.

use std::net::IpAddr;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::reachability::{ProbeOutcome, ProbeTargets, ReachabilityReport};

/// Per-probe timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Extra time granted to the `ping` process on top of its own timeout before
/// it is killed.  Covers process start-up.
const PING_GRACE: Duration = Duration::from_millis(200);

/// Sends one reachability probe to one target.
///
/// Implementations must never fail: every error collapses into
/// [`ProbeOutcome::Unreachable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: IpAddr, timeout: Duration) -> ProbeOutcome;
}

/// [`Prober`] backed by the operating system's `ping` command.
///
/// `ping` is used instead of a raw ICMP socket because it is setuid (or has
/// `CAP_NET_RAW`) on every distribution, so the dashboard can run as an
/// unprivileged user.
#[derive(Debug, Clone)]
pub struct PingProber {
    program: String,
}

impl PingProber {
    pub fn new() -> Self {
        Self {
            program: "ping".to_string(),
        }
    }

    /// Uses a different executable, e.g. an absolute path to `ping`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the argument list for a single-echo ping with `timeout`.
fn ping_args(target: IpAddr, timeout: Duration) -> Vec<String> {
    let millis = timeout.as_millis().max(1);

    if cfg!(target_os = "windows") {
        // -w is in milliseconds.
        vec!["-n".into(), "1".into(), "-w".into(), millis.to_string(), target.to_string()]
    } else if cfg!(target_os = "macos") {
        // BSD ping: -W is in milliseconds.
        vec!["-c".into(), "1".into(), "-W".into(), millis.to_string(), target.to_string()]
    } else {
        // iputils ping: -W is in (fractional) seconds.
        let secs = timeout.as_secs_f64().max(0.1);
        vec![
            "-c".into(),
            "1".into(),
            "-W".into(),
            format!("{secs:.1}"),
            target.to_string(),
        ]
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, target: IpAddr, timeout: Duration) -> ProbeOutcome {
        let mut child = match Command::new(&self.program)
            .args(ping_args(target, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!("cannot start {} for {target}: {e}", self.program);
                return ProbeOutcome::Unreachable;
            }
        };

        match tokio::time::timeout(timeout + PING_GRACE, child.wait()).await {
            Ok(Ok(status)) => ProbeOutcome::from(status.success()),
            Ok(Err(e)) => {
                debug!("waiting for ping {target} failed: {e}");
                ProbeOutcome::Unreachable
            }
            Err(_) => {
                // `child` is dropped here and killed.
                debug!("ping {target} did not exit within {:?}", timeout + PING_GRACE);
                ProbeOutcome::Unreachable
            }
        }
    }
}

/// Answers "is this host online?" by probing two targets concurrently.
#[derive(Clone)]
pub struct ReachabilityProbe {
    prober: Arc<dyn Prober>,
    targets: ProbeTargets,
    timeout: Duration,
}

impl ReachabilityProbe {
    pub fn new(prober: Arc<dyn Prober>, targets: ProbeTargets, timeout: Duration) -> Self {
        Self {
            prober,
            targets,
            timeout,
        }
    }

    /// A probe using the system `ping`.
    pub fn with_ping(targets: ProbeTargets, timeout: Duration) -> Self {
        Self::new(Arc::new(PingProber::new()), targets, timeout)
    }

    pub fn targets(&self) -> ProbeTargets {
        self.targets
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes both targets concurrently and returns both outcomes.
    ///
    /// A probe task that panics counts as unreachable.
    pub async fn check(&self) -> ReachabilityReport {
        let gateway = self.spawn_probe(self.targets.gateway);
        let internet = self.spawn_probe(self.targets.internet);
        let (gateway, internet) = tokio::join!(gateway, internet);

        let report = ReachabilityReport {
            gateway: settle(self.targets.gateway, gateway),
            internet: settle(self.targets.internet, internet),
        };
        debug!(
            "reachability: gateway {} {:?}, internet {} {:?}",
            self.targets.gateway, report.gateway, self.targets.internet, report.internet
        );
        report
    }

    /// `true` if at least one target answered.
    pub async fn is_online(&self) -> bool {
        self.check().await.online()
    }

    fn spawn_probe(&self, target: IpAddr) -> JoinHandle<ProbeOutcome> {
        let prober = Arc::clone(&self.prober);
        let timeout = self.timeout;
        tokio::spawn(async move { prober.probe(target, timeout).await })
    }
}

impl std::fmt::Debug for ReachabilityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReachabilityProbe")
            .field("targets", &self.targets)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn settle(
    target: IpAddr,
    joined: Result<ProbeOutcome, tokio::task::JoinError>,
) -> ProbeOutcome {
    joined.unwrap_or_else(|e| {
        warn!("probe task for {target} failed: {e}");
        ProbeOutcome::Unreachable
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reachability::{DEFAULT_GATEWAY, DEFAULT_INTERNET};
    use mockall::predicate::eq;

    fn probe_with(mock: MockProber) -> ReachabilityProbe {
        ReachabilityProbe::new(Arc::new(mock), ProbeTargets::default(), DEFAULT_PROBE_TIMEOUT)
    }

    fn mock_answering(gateway: ProbeOutcome, internet: ProbeOutcome) -> MockProber {
        let mut mock = MockProber::new();
        mock.expect_probe()
            .with(eq(DEFAULT_GATEWAY), eq(DEFAULT_PROBE_TIMEOUT))
            .times(1)
            .return_const(gateway);
        mock.expect_probe()
            .with(eq(DEFAULT_INTERNET), eq(DEFAULT_PROBE_TIMEOUT))
            .times(1)
            .return_const(internet);
        mock
    }

    #[tokio::test]
    async fn test_online_when_gateway_reachable_and_internet_not() {
        let probe = probe_with(mock_answering(
            ProbeOutcome::Reachable,
            ProbeOutcome::Unreachable,
        ));
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn test_online_when_internet_reachable_and_gateway_not() {
        let probe = probe_with(mock_answering(
            ProbeOutcome::Unreachable,
            ProbeOutcome::Reachable,
        ));
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn test_offline_when_both_unreachable() {
        let probe = probe_with(mock_answering(
            ProbeOutcome::Unreachable,
            ProbeOutcome::Unreachable,
        ));
        assert!(!probe.is_online().await);
    }

    #[tokio::test]
    async fn test_online_when_both_reachable() {
        let probe = probe_with(mock_answering(
            ProbeOutcome::Reachable,
            ProbeOutcome::Reachable,
        ));
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn test_check_reports_each_target() {
        let probe = probe_with(mock_answering(
            ProbeOutcome::Unreachable,
            ProbeOutcome::Reachable,
        ));

        let report = probe.check().await;

        assert_eq!(report.gateway, ProbeOutcome::Unreachable);
        assert_eq!(report.internet, ProbeOutcome::Reachable);
    }

    struct PanickingProber;

    #[async_trait]
    impl Prober for PanickingProber {
        async fn probe(&self, _target: IpAddr, _timeout: Duration) -> ProbeOutcome {
            panic!("injected probe failure");
        }
    }

    #[tokio::test]
    async fn test_panicking_probe_counts_as_unreachable() {
        let probe = ReachabilityProbe::new(
            Arc::new(PanickingProber),
            ProbeTargets::default(),
            DEFAULT_PROBE_TIMEOUT,
        );

        let report = probe.check().await;

        assert_eq!(report.gateway, ProbeOutcome::Unreachable);
        assert!(!report.online());
    }

    #[tokio::test]
    async fn test_missing_ping_binary_is_unreachable() {
        let prober = PingProber::with_program("/nonexistent/bin/ping-that-does-not-exist");
        let outcome = prober.probe(DEFAULT_INTERNET, DEFAULT_PROBE_TIMEOUT).await;
        assert_eq!(outcome, ProbeOutcome::Unreachable);
    }

    #[test]
    fn test_ping_args_send_a_single_echo() {
        let args = ping_args(DEFAULT_INTERNET, Duration::from_millis(300));
        assert_eq!(args.last().map(String::as_str), Some("1.1.1.1"));
        assert!(args.windows(2).any(|w| w[1] == "1" && (w[0] == "-c" || w[0] == "-n")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_ping_args_use_fractional_seconds_on_linux() {
        let args = ping_args(DEFAULT_INTERNET, Duration::from_millis(300));
        assert_eq!(args, vec!["-c", "1", "-W", "0.3", "1.1.1.1"]);
    }
}

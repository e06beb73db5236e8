//! Reachability domain types.
//!
//! A reachability check sends one probe to each of two fixed targets:
//!
//! - the **gateway** (the local router), which answers even when the WAN is
//!   down, and
//! - an **internet** address, which answers even when the router itself
//!   does not reply to pings.
//!
//! The host counts as online if *either* probe succeeds.  A single failed
//! probe is expected and never surfaced as an error.

use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;

/// Default local gateway address.
pub const DEFAULT_GATEWAY: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));

/// Default public address (Cloudflare DNS).
pub const DEFAULT_INTERNET: IpAddr = IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1));

/// Result of one probe against one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The target answered within the timeout.
    Reachable,
    /// Timeout, unreachable network, missing permission, or any other failure.
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable)
    }
}

impl From<bool> for ProbeOutcome {
    fn from(reachable: bool) -> Self {
        if reachable {
            Self::Reachable
        } else {
            Self::Unreachable
        }
    }
}

/// The two addresses a reachability check probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTargets {
    pub gateway: IpAddr,
    pub internet: IpAddr,
}

impl Default for ProbeTargets {
    fn default() -> Self {
        Self {
            gateway: DEFAULT_GATEWAY,
            internet: DEFAULT_INTERNET,
        }
    }
}

/// Per-target outcomes of one reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReachabilityReport {
    pub gateway: ProbeOutcome,
    pub internet: ProbeOutcome,
}

impl ReachabilityReport {
    /// `true` if at least one target answered.
    pub fn online(&self) -> bool {
        self.gateway.is_reachable() || self.internet.is_reachable()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

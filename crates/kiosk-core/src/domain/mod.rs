//! Domain layer for kiosk-core.
//!
//! Pure types that have no dependencies on the file system, the network, or
//! an async runtime.  Everything here can be unit-tested with plain values.
//!
//! - `document`     – the kiosk configuration document, its defaults, and the
//!   normalization that upgrades legacy or incomplete files.
//! - `reachability` – probe targets, per-probe outcomes, and the OR reduction.

pub mod document;
pub mod reachability;

pub use document::{DocumentError, DocumentShape, KioskDocument};
pub use reachability::{ProbeOutcome, ProbeTargets, ReachabilityReport};

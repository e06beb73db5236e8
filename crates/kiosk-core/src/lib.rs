//! # kiosk-core
//!
//! Shared library for the kiosk dashboard containing the configuration
//! document model, the file-backed configuration store, and the network
//! reachability probe.
//!
//! # Architecture overview
//!
//! A kiosk is a screen that rotates through a list of web pages.  The
//! dashboard lets an operator edit that list from a browser on the LAN.  This
//! crate is the part of the system that actually holds state or does anything
//! concurrent:
//!
//! - **`domain`** – Pure types with no I/O.  [`KioskDocument`] is the one
//!   persisted entity; [`ProbeOutcome`] and [`ReachabilityReport`] describe the
//!   result of a network check.
//!
//! - **`storage`** – [`ConfigStore`] reads and writes the JSON document,
//!   upgrades legacy files, and offers a cheap "has it changed?" poll based on
//!   the file's modification time.
//!
//! - **`network`** – [`ReachabilityProbe`] pings a gateway address and a public
//!   address concurrently and reports the host online if either answers.
//!
//! The HTTP service in `kiosk-dashboard` consumes this crate; nothing here
//! knows about HTTP or HTML.

pub mod domain;
pub mod network;
pub mod storage;

pub use domain::document::{DocumentError, DocumentShape, KioskDocument};
pub use domain::reachability::{ProbeOutcome, ProbeTargets, ReachabilityReport};
pub use network::probe::{PingProber, Prober, ReachabilityProbe};
pub use storage::config_store::{ConfigStore, PollOutcome, StoreError};

//! Network infrastructure: reachability probing.
//!
//! The `probe` sub-module defines the [`Prober`](probe::Prober) seam, the
//! production [`PingProber`](probe::PingProber) that shells out to the system
//! `ping`, and [`ReachabilityProbe`](probe::ReachabilityProbe), which runs two
//! probes concurrently and reduces them to a single online/offline answer.

pub mod probe;

pub use probe::{PingProber, Prober, ReachabilityProbe};

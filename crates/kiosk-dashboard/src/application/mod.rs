//! Application layer for the dashboard.
//!
//! Use cases here turn a request into a change to the kiosk document or a
//! system action.  They depend on the `kiosk-core` store and on the
//! [`SystemController`](system::SystemController) trait, never on HTTP types.
//!
//! # Sub-modules
//!
//! - **`manage`** – Form actions from the management page (add/remove URL,
//!   layout, generator URL, lock).
//! - **`system`** – Stopping the kiosk session and rebooting the host.
//! - **`error`**  – The error type shared by both.
//!
//! Every mutating use case first loads the document and refuses to proceed
//! while the dashboard is locked.

pub mod error;
pub mod manage;
pub mod system;

pub use error::ActionError;

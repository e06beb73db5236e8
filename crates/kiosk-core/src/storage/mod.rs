//! Storage: the JSON configuration file.
//!
//! The `config_store` sub-module handles:
//!
//! - Creating the file with defaults on first run.
//! - Upgrading legacy and incomplete files while loading.
//! - Writing the complete document back after every change.
//! - Cheap change detection based on file metadata, so the display page can
//!   refresh only when an operator actually edited something.

pub mod config_store;

pub use config_store::{ConfigStore, PollOutcome, StoreError};

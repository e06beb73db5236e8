//! Errors returned by dashboard use cases.

use kiosk_core::StoreError;
use thiserror::Error;

use crate::application::system::SystemError;

/// Why a dashboard action could not be completed.
#[derive(Debug, Error)]
pub enum ActionError {
    /// `dashboard_enabled` is false; mutating actions are refused.
    #[error("the dashboard is locked")]
    Locked,

    /// The configuration file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A system command failed.
    #[error(transparent)]
    System(#[from] SystemError),

    /// The blocking worker that touched the file panicked or was cancelled.
    #[error("store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

//! SystemActionUseCase: stopping the kiosk session and rebooting the host.
//!
//! The actual process spawning lives in
//! `infrastructure::system_control`; this module only defines the seam and
//! enforces the lock.

use std::sync::Arc;

use async_trait::async_trait;
use kiosk_core::ConfigStore;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::error::ActionError;

/// A privileged operation on the kiosk host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAction {
    /// Stop the systemd unit that runs the kiosk browser.
    StopSession,
    /// Reboot the machine.
    Reboot,
}

/// Error type for system command execution.
#[derive(Debug, Error)]
pub enum SystemError {
    /// The command could not be started at all.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("`{command}` failed: {status}")]
    Failed { command: String, status: String },
}

/// Executes [`SystemAction`]s.
///
/// Infrastructure uses `systemctl` / `reboot`; tests record calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemController: Send + Sync {
    async fn execute(&self, action: SystemAction) -> Result<(), SystemError>;
}

/// Runs `action` unless the dashboard is locked.
///
/// # Errors
///
/// Returns [`ActionError::Locked`] if `dashboard_enabled` is false,
/// [`ActionError::Store`] if the document cannot be loaded, and
/// [`ActionError::System`] if the command fails.
pub async fn perform(
    store: &Arc<ConfigStore>,
    controller: &dyn SystemController,
    action: SystemAction,
) -> Result<(), ActionError> {
    let store = Arc::clone(store);
    let locked =
        tokio::task::spawn_blocking(move || store.load().map(|doc| doc.is_locked())).await??;
    if locked {
        warn!("refusing {action:?}: dashboard is locked");
        return Err(ActionError::Locked);
    }

    info!("executing system action {action:?}");
    controller.execute(action).await?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

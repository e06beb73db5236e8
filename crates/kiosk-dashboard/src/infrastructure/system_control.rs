//! [`SystemController`] backed by real processes.
//!
//! | Action        | Command                              |
//! |---------------|--------------------------------------|
//! | `StopSession` | `sudo systemctl stop <service>`      |
//! | `Reboot`      | `sudo reboot`                        |
//!
//! The dashboard normally runs as an unprivileged user with a sudoers entry
//! for exactly these two commands.  `--no-sudo` drops the prefix when it
//! already runs as root.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::application::system::{SystemAction, SystemController, SystemError};

/// Runs system actions with `tokio::process`.
#[derive(Debug, Clone)]
pub struct CommandSystemController {
    session_service: String,
    launcher: Option<String>,
}

impl CommandSystemController {
    /// Creates a controller, using `sudo` as launcher when `use_sudo` is set.
    pub fn new(session_service: impl Into<String>, use_sudo: bool) -> Self {
        Self::with_launcher(session_service, use_sudo.then(|| "sudo".to_string()))
    }

    /// Creates a controller with an arbitrary launcher (or none).
    pub fn with_launcher(session_service: impl Into<String>, launcher: Option<String>) -> Self {
        Self {
            session_service: session_service.into(),
            launcher,
        }
    }

    /// The full argv for `action`, launcher first.
    pub fn argv(&self, action: SystemAction) -> Vec<String> {
        let mut argv: Vec<String> = self.launcher.iter().cloned().collect();
        match action {
            SystemAction::StopSession => {
                argv.extend(["systemctl".to_string(), "stop".to_string()]);
                argv.push(self.session_service.clone());
            }
            SystemAction::Reboot => argv.push("reboot".to_string()),
        }
        argv
    }
}

#[async_trait]
impl SystemController for CommandSystemController {
    async fn execute(&self, action: SystemAction) -> Result<(), SystemError> {
        let argv = self.argv(action);
        let command = argv.join(" ");
        let Some((program, args)) = argv.split_first() else {
            return Err(SystemError::Failed {
                command,
                status: "empty command line".to_string(),
            });
        };

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| SystemError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            info!("`{command}` completed");
            Ok(())
        } else {
            Err(SystemError::Failed {
                command,
                status: status.to_string(),
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

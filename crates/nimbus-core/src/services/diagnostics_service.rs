//! Status checks backed by the sandboxed executor.
//!
//! Output comes back as a [`DiagnosticReport`] on the success path. Nothing
//! here tunnels command output through an error value.

use nimbus_security::{CommandPolicy, DiagnosticReport, SandboxError, SandboxedExecutor};
use nimbus_shared::config::DiagnosticsSettings;
use tracing::warn;

use crate::error::DomainError;

pub struct DiagnosticsService {
    enabled: bool,
    executor: SandboxedExecutor,
}

impl DiagnosticsService {
    pub fn new(settings: &DiagnosticsSettings) -> Self {
        Self {
            enabled: settings.enabled,
            executor: SandboxedExecutor::new(CommandPolicy::from(settings)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn run_command(&self, command_text: &str) -> Result<DiagnosticReport, DomainError> {
        if !self.enabled {
            return Err(DomainError::DiagnosticsDisabled);
        }

        self.executor.run(command_text).await.map_err(|e| {
            warn!("Diagnostic command refused or failed: {}", e);
            match e {
                SandboxError::Spawn(_) | SandboxError::Wait(_) => {
                    DomainError::CommandFailed(e.to_string())
                }
                _ => DomainError::CommandRejected(e.to_string()),
            }
        })
    }
}

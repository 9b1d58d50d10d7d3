//! Domain errors

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Missing or short input. `fields` maps field name to its message.
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// Same text whether the email is unknown or the password is wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Diagnostics are disabled")]
    DiagnosticsDisabled,

    #[error("Command rejected: {0}")]
    CommandRejected(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }
}

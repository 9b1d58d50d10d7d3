//! Configuration management

use std::collections::BTreeMap;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_ALLOWED_ARGS, DEFAULT_ALLOWED_PROGRAMS, DEFAULT_COMMAND_MAX_ARGS,
    DEFAULT_COMMAND_MAX_OUTPUT_BYTES, DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_USERS_PATH,
    SESSION_COOKIE_MAX_AGE_SECS, SESSION_COOKIE_NAME, SESSION_MAX_AGE_CEILING_SECS,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub security: SecuritySettings,
    pub diagnostics: DiagnosticsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// What the user store does when a durable write fails.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Log and carry on; the live session still authenticates the caller.
    #[default]
    BestEffort,
    /// Fail the enclosing operation.
    Strict,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub users_path: String,
    pub persistence_policy: PersistencePolicy,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub max_age_seconds: i64,
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSite,
    /// Off by default: cookie max-age stays a client-side hint.
    pub enforce_expiry: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HasherKind {
    #[default]
    Sha256,
    Argon2,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecuritySettings {
    pub password_hasher: HasherKind,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiagnosticsSettings {
    pub enabled: bool,
    pub allowed_programs: Vec<String>,
    /// Exact argument tokens per program. A program missing here runs with
    /// no arguments at all.
    #[serde(default = "default_allowed_args")]
    pub allowed_args: BTreeMap<String, Vec<String>>,
    pub max_args: usize,
    pub timeout_ms: u64,
    pub max_output_bytes: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            max_age_seconds: SESSION_COOKIE_MAX_AGE_SECS,
            secure: false,
            same_site: SameSite::Lax,
            enforce_expiry: false,
        }
    }
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_programs: DEFAULT_ALLOWED_PROGRAMS.iter().map(|p| p.to_string()).collect(),
            allowed_args: default_allowed_args(),
            max_args: DEFAULT_COMMAND_MAX_ARGS,
            timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            max_output_bytes: DEFAULT_COMMAND_MAX_OUTPUT_BYTES,
        }
    }
}

fn default_allowed_args() -> BTreeMap<String, Vec<String>> {
    DEFAULT_ALLOWED_ARGS
        .iter()
        .map(|(program, args)| {
            (
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config: Self = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("diagnostics.allowed_programs"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would leave the service unusable.
    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |key: &str, message: &str| {
            Err(AppError::InvalidSetting {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.session.cookie_name.trim().is_empty() {
            return invalid("session.cookie_name", "must not be empty");
        }
        if self.session.max_age_seconds <= 0 {
            return invalid("session.max_age_seconds", "must be positive");
        }
        if self.session.max_age_seconds > SESSION_MAX_AGE_CEILING_SECS {
            return invalid("session.max_age_seconds", "must not exceed 400 days");
        }
        if self.session.same_site == SameSite::None && !self.session.secure {
            return invalid("session.same_site", "\"none\" requires session.secure");
        }
        if self.storage.backend == StorageBackend::File && self.storage.users_path.trim().is_empty() {
            return invalid("storage.users_path", "required for the file backend");
        }
        if self.diagnostics.timeout_ms == 0 {
            return invalid("diagnostics.timeout_ms", "must be positive");
        }
        if self.diagnostics.max_output_bytes == 0 {
            return invalid("diagnostics.max_output_bytes", "must be positive");
        }
        if self.diagnostics.allowed_programs.iter().any(|p| p.contains('/')) {
            return invalid("diagnostics.allowed_programs", "bare program names only");
        }
        if self.diagnostics.allowed_args.values().flatten().any(|a| a.contains("..")) {
            return invalid("diagnostics.allowed_args", "must not contain \"..\"");
        }
        Ok(())
    }

    /// Built-in defaults only, no files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let session = SessionSettings::default();
        let diagnostics = DiagnosticsSettings::default();
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "nimbus-server")?
            .set_default("storage.backend", "file")?
            .set_default("storage.users_path", DEFAULT_USERS_PATH)?
            .set_default("storage.persistence_policy", "best_effort")?
            .set_default("session.cookie_name", session.cookie_name)?
            .set_default("session.max_age_seconds", session.max_age_seconds)?
            .set_default("session.secure", session.secure)?
            .set_default("session.same_site", "lax")?
            .set_default("session.enforce_expiry", session.enforce_expiry)?
            .set_default("security.password_hasher", "sha256")?
            .set_default("diagnostics.enabled", diagnostics.enabled)?
            .set_default("diagnostics.allowed_programs", diagnostics.allowed_programs)?
            .set_default("diagnostics.max_args", diagnostics.max_args as u64)?
            .set_default("diagnostics.timeout_ms", diagnostics.timeout_ms)?
            .set_default("diagnostics.max_output_bytes", diagnostics.max_output_bytes as u64)
    }
}

use std::sync::Arc;

use nimbus_core::repositories::UserRepository;
use nimbus_core::services::{AuthService, DiagnosticsService, UserStore};
use nimbus_infrastructure::build_user_repository;
use nimbus_security::{hasher_for, SessionRegistry};
use nimbus_shared::config::AppConfig;

/// Application state shared across handlers.
///
/// Built once per process. The session registry inside `auth` lives exactly
/// as long as this state does.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub diagnostics: Arc<DiagnosticsService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let repo = build_user_repository(&config.storage);
        Self::with_repository(config, repo)
    }

    pub fn with_repository(config: AppConfig, repo: Arc<dyn UserRepository>) -> Self {
        let store = Arc::new(UserStore::new(repo, config.storage.persistence_policy));
        let sessions = if config.session.enforce_expiry {
            SessionRegistry::with_expiry(config.session.max_age_seconds)
        } else {
            SessionRegistry::new()
        };
        let auth = Arc::new(AuthService::new(
            store,
            sessions,
            hasher_for(config.security.password_hasher),
            config.session.clone(),
        ));
        let diagnostics = Arc::new(DiagnosticsService::new(&config.diagnostics));

        Self {
            auth,
            diagnostics,
            config: Arc::new(config),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}

// ============================================================================
// Nimbus Core - Authentication Service
// File: crates/nimbus-core/src/services/auth_service.rs
// ============================================================================
//! Register, login, logout, and identify over the user store and the
//! session registry.

use std::sync::Arc;

use nimbus_security::{CookieDirective, CredentialHasher, SessionRegistry};
use nimbus_shared::config::SessionSettings;
use nimbus_shared::constants::{REDIRECT_AFTER_AUTH, REDIRECT_AFTER_LOGOUT};
use nimbus_shared::utils::mask_email;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{PublicProfile, RegisterInput, User};
use crate::error::DomainError;
use crate::services::UserStore;

/// Authentication service for the anonymous -> authenticated flows
pub struct AuthService {
    store: Arc<UserStore>,
    sessions: SessionRegistry,
    hasher: Arc<dyn CredentialHasher>,
    session_settings: SessionSettings,
}

impl AuthService {
    pub fn new(
        store: Arc<UserStore>,
        sessions: SessionRegistry,
        hasher: Arc<dyn CredentialHasher>,
        session_settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            sessions,
            hasher,
            session_settings,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Register a new user and sign them in.
    ///
    /// An email that is already taken is not an error: the insert is skipped
    /// and the session names the new, unsaved id, which `identify` will not
    /// resolve. The existing account is never handed to the caller.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthOutcome, DomainError> {
        info!("Registration attempt for email: {}", mask_email(&input.email));

        if let Err(e) = input.check() {
            warn!("Registration rejected: {}", e);
            return Err(e);
        }

        let digest = self
            .hasher
            .digest(&input.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let user = User::new(
            input.first_name,
            input.last_name,
            &input.email,
            digest,
            input.company,
        );

        if !self.store.upsert_if_absent(&user).await? {
            warn!(
                "Registration for existing email {} accepted without insert",
                mask_email(&user.email)
            );
        }

        info!("Registration successful for: {}", mask_email(&user.email));
        Ok(self.issue_session(&user))
    }

    /// Login with email and password. No length rule on the password here.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, DomainError> {
        info!("Login attempt for email: {}", mask_email(email));

        if email.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Email and password are required"));
        }

        let user = self.store.find_by_email(email).await.ok_or_else(|| {
            warn!("Login failed: email not found: {}", mask_email(email));
            DomainError::InvalidCredentials
        })?;

        let password_valid = self
            .hasher
            .verify(password, &user.password_digest)
            .map_err(|_e| DomainError::InvalidCredentials)?;

        if !password_valid {
            warn!("Login failed: invalid password for: {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        }

        info!("Login successful for: {}", mask_email(email));
        Ok(self.issue_session(&user))
    }

    /// Drops the session, if any, and tells the client to forget the cookie.
    pub fn logout(&self, token: Option<&str>) -> LogoutOutcome {
        if let Some(token) = token {
            self.sessions.revoke(token);
        }
        LogoutOutcome {
            cookie: CookieDirective::clear(&self.session_settings),
            redirect_to: REDIRECT_AFTER_LOGOUT,
        }
    }

    /// Resolves a session token to the caller's public profile.
    pub async fn identify(&self, token: Option<&str>) -> Option<PublicProfile> {
        let session = self.sessions.lookup(token?)?;
        let user = self.store.find_by_id(&session.user_id).await?;
        Some(PublicProfile::from(&user))
    }

    fn issue_session(&self, user: &User) -> AuthOutcome {
        let token = self.sessions.create(user.id, &user.email);
        AuthOutcome {
            cookie: CookieDirective::session(token, &self.session_settings),
            redirect_to: REDIRECT_AFTER_AUTH,
            user_id: user.id,
        }
    }
}

/// Result of a successful register or login
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub cookie: CookieDirective,
    pub redirect_to: &'static str,
    pub user_id: Uuid,
}

impl AuthOutcome {
    pub fn token(&self) -> &str {
        &self.cookie.value
    }
}

/// Result of a logout
#[derive(Debug, Clone)]
pub struct LogoutOutcome {
    pub cookie: CookieDirective,
    pub redirect_to: &'static str,
}

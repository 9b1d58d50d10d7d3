//! In-memory session registry.
//!
//! One registry is built when the server starts and shared by every request
//! handler. Nothing in it is ever written to disk: dropping the registry (or
//! restarting the process) logs every caller out at once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use nimbus_shared::constants::SESSION_MAX_AGE_CEILING_SECS;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::token::generate_session_token;

/// What a session token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    identity: SessionIdentity,
    created_at: DateTime<Utc>,
}

/// Thread-safe token -> identity map.
///
/// By default entries live until revoked or the registry goes away; the
/// cookie's max-age is not consulted. With `max_age` set, `lookup` treats
/// older entries as absent and drops them lazily.
#[derive(Clone)]
pub struct SessionRegistry {
    storage: Arc<DashMap<String, SessionEntry>>,
    max_age: Option<Duration>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        info!("Initializing session registry (expiry not enforced)");
        Self {
            storage: Arc::new(DashMap::new()),
            max_age: None,
        }
    }

    /// Registry that enforces `max_age_seconds` on every lookup. The age
    /// is clamped to `0..=SESSION_MAX_AGE_CEILING_SECS`.
    pub fn with_expiry(max_age_seconds: i64) -> Self {
        let max_age_seconds = max_age_seconds.clamp(0, SESSION_MAX_AGE_CEILING_SECS);
        info!("Initializing session registry (expiry after {}s)", max_age_seconds);
        Self {
            storage: Arc::new(DashMap::new()),
            max_age: Some(Duration::seconds(max_age_seconds)),
        }
    }

    pub fn enforces_expiry(&self) -> bool {
        self.max_age.is_some()
    }

    pub fn create(&self, user_id: Uuid, email: &str) -> String {
        let token = generate_session_token();
        let entry = SessionEntry {
            identity: SessionIdentity {
                user_id,
                email: email.to_string(),
            },
            created_at: Utc::now(),
        };
        self.storage.insert(token.clone(), entry);
        debug!("Created session for user {}", user_id);
        token
    }

    pub fn lookup(&self, token: &str) -> Option<SessionIdentity> {
        let entry = self.storage.get(token)?;
        if self.is_expired(entry.value()) {
            drop(entry);
            self.storage.remove(token);
            debug!("Session expired, removed from registry");
            return None;
        }
        Some(entry.value().identity.clone())
    }

    /// Removes the entry. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) {
        if let Some((_, entry)) = self.storage.remove(token) {
            debug!("Revoked session for user {}", entry.identity.user_id);
        }
    }

    /// Sweeps expired entries. Always zero when expiry is not enforced.
    pub fn purge_expired(&self) -> usize {
        if self.max_age.is_none() {
            return 0;
        }
        let start_len = self.storage.len();
        self.storage.retain(|_, entry| !self.is_expired(entry));
        let count = start_len.saturating_sub(self.storage.len());
        if count > 0 {
            info!("Purged {} expired sessions", count);
        }
        count
    }

    /// Runs `purge_expired` every `every` on a background task. Returns
    /// `None` when expiry is not enforced, since there is nothing to sweep.
    pub fn spawn_sweeper(&self, every: std::time::Duration) -> Option<JoinHandle<()>> {
        if !self.enforces_expiry() {
            return None;
        }
        let registry = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                registry.purge_expired();
            }
        }))
    }

    /// Drops every session; returns how many were discarded.
    pub fn clear(&self) -> usize {
        let count = self.storage.len();
        self.storage.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry) -> bool {
        match self.max_age {
            Some(max_age) => Utc::now() - entry.created_at >= max_age,
            None => false,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Nimbus Core - User Store
// File: crates/nimbus-core/src/services/user_store.rs
// ============================================================================
//! Lookups and inserts over a [`UserRepository`], with the write-failure
//! policy made explicit.

use std::collections::HashMap;
use std::sync::Arc;

use nimbus_shared::config::PersistencePolicy;
use nimbus_shared::utils::{emails_match, mask_email};
use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// User collection backed by a whole-document repository.
///
/// Users inserted by this process are also kept in a live overlay, so a
/// caller registered while the backing file was unwritable (or whose write
/// lost a race) still resolves until the process exits. The overlay is only
/// consulted for lookups; `load_all` reports what the repository holds.
pub struct UserStore {
    repo: Arc<dyn UserRepository>,
    policy: PersistencePolicy,
    live: RwLock<HashMap<Uuid, User>>,
}

impl UserStore {
    pub fn new(repo: Arc<dyn UserRepository>, policy: PersistencePolicy) -> Self {
        Self {
            repo,
            policy,
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Never fails: an unreadable store reads as empty.
    pub async fn load_all(&self) -> Vec<User> {
        match self.repo.load_all().await {
            Ok(users) => users,
            Err(e) => {
                warn!("User store read failed, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Returns whether the write landed. Under [`PersistencePolicy::Strict`]
    /// a failed write is an error instead.
    pub async fn save_all(&self, users: &[User]) -> Result<bool, DomainError> {
        match self.repo.save_all(users).await {
            Ok(()) => Ok(true),
            Err(e) => match self.policy {
                PersistencePolicy::BestEffort => {
                    warn!("User store write failed, continuing without durable effect: {}", e);
                    Ok(false)
                }
                PersistencePolicy::Strict => Err(e),
            },
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let stored = self
            .load_all()
            .await
            .into_iter()
            .find(|u| emails_match(&u.email, email));
        stored.or_else(|| {
            self.live
                .read()
                .values()
                .find(|u| emails_match(&u.email, email))
                .cloned()
        })
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Option<User> {
        let stored = self.load_all().await.into_iter().find(|u| &u.id == id);
        stored.or_else(|| self.live.read().get(id).cloned())
    }

    /// Inserts `user` unless its email is already taken (case-insensitive).
    ///
    /// Read-modify-write of the whole collection with no lock across the
    /// await points: two concurrent inserts can both succeed here while only
    /// one survives on disk.
    pub async fn upsert_if_absent(&self, user: &User) -> Result<bool, DomainError> {
        let mut users = self.load_all().await;
        let taken = users.iter().any(|u| emails_match(&u.email, &user.email))
            || self
                .live
                .read()
                .values()
                .any(|u| emails_match(&u.email, &user.email));
        if taken {
            debug!("Email {} already registered, skipping insert", mask_email(&user.email));
            return Ok(false);
        }

        users.push(user.clone());
        // Held live before the write so a failed or lost write still resolves.
        self.live.write().insert(user.id, user.clone());
        match self.save_all(&users).await {
            Ok(true) => {}
            Ok(false) => debug!("User {} held in memory only", user.id),
            Err(e) => {
                self.live.write().remove(&user.id);
                return Err(e);
            }
        }
        Ok(true)
    }
}

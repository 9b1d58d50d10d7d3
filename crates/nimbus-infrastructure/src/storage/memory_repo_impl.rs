// ============================================================================
// Nimbus Infrastructure - In-Memory User Repository
// File: crates/nimbus-infrastructure/src/storage/memory_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use parking_lot::RwLock;

use nimbus_core::domain::User;
use nimbus_core::error::DomainError;
use nimbus_core::repositories::UserRepository;

/// Process-local repository. Handy for development and tests; a read-only
/// instance rejects every save the way a read-only filesystem would.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    read_only: bool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            read_only: true,
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn load_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.read().clone())
    }

    async fn save_all(&self, users: &[User]) -> Result<(), DomainError> {
        if self.read_only {
            return Err(DomainError::Persistence("store is read-only".to_string()));
        }
        *self.users.write() = users.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_only_rejects_saves() {
        let repo = InMemoryUserRepository::read_only();
        let user = User::new("Ann".into(), "Lee".into(), "ann@x.com", "d".into(), None);
        assert!(repo.save_all(&[user]).await.is_err());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_collection() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("Ann".into(), "Lee".into(), "ann@x.com", "d".into(), None);
        repo.save_all(&[user.clone(), user.clone()]).await.unwrap();
        repo.save_all(&[user]).await.unwrap();
        assert_eq!(repo.len(), 1);
    }
}

//! User repository trait (port)
//!
//! The backing store is a whole-collection document: callers read every
//! record, mutate in memory, and write the lot back. There is no
//! compare-and-swap; concurrent writers race and the last write wins.

use async_trait::async_trait;

use crate::domain::User;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user. A store that doesn't exist yet is empty, not an error.
    async fn load_all(&self) -> Result<Vec<User>, DomainError>;

    /// Replaces the stored collection wholesale.
    async fn save_all(&self, users: &[User]) -> Result<(), DomainError>;
}

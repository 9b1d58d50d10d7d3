// ============================================================================
// Nimbus Infrastructure - JSON File User Repository
// File: crates/nimbus-infrastructure/src/storage/json_file_repo_impl.rs
// ============================================================================

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use nimbus_core::domain::User;
use nimbus_core::error::DomainError;
use nimbus_core::repositories::UserRepository;

/// On-disk document: `{ "users": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersDocument {
    users: Vec<User>,
}

/// All users in one pretty-printed JSON file, rewritten on every save.
pub struct JsonFileUserRepository {
    path: PathBuf,
}

impl JsonFileUserRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn load_all(&self) -> Result<Vec<User>, DomainError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("User file {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("DB read error for {}: {}", self.path.display(), e);
                return Err(DomainError::Persistence(e.to_string()));
            }
        };

        let document: UsersDocument = serde_json::from_str(&raw).map_err(|e| {
            error!("DB parse error for {}: {}", self.path.display(), e);
            DomainError::Persistence(e.to_string())
        })?;
        Ok(document.users)
    }

    async fn save_all(&self, users: &[User]) -> Result<(), DomainError> {
        let document = UsersDocument {
            users: users.to_vec(),
        };
        let body = serde_json::to_string_pretty(&document)
            .map_err(|e| DomainError::Persistence(e.to_string()))?;

        tokio::fs::write(&self.path, body).await.map_err(|e| {
            error!("DB write error for {}: {}", self.path.display(), e);
            DomainError::Persistence(e.to_string())
        })?;
        debug!("Wrote {} users to {}", users.len(), self.path.display());
        Ok(())
    }
}

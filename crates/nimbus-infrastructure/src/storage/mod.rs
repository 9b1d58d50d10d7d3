//! Storage module (user repository adapters)

pub mod json_file_repo_impl;
pub mod memory_repo_impl;

use std::sync::Arc;

use nimbus_core::repositories::UserRepository;
use nimbus_shared::config::{StorageBackend, StorageSettings};
use tracing::info;

pub use json_file_repo_impl::JsonFileUserRepository;
pub use memory_repo_impl::InMemoryUserRepository;

/// Picks the adapter named by `storage.backend`.
pub fn build_user_repository(settings: &StorageSettings) -> Arc<dyn UserRepository> {
    match settings.backend {
        StorageBackend::File => {
            info!("Using JSON file user store at {}", settings.users_path);
            Arc::new(JsonFileUserRepository::new(&settings.users_path))
        }
        StorageBackend::Memory => {
            info!("Using in-memory user store");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

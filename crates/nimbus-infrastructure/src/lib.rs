//! # Nimbus Infrastructure
//! 
//! Storage adapters for the user repository port.

pub mod storage;

pub use storage::{build_user_repository, InMemoryUserRepository, JsonFileUserRepository};

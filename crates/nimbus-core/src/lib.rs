//! # Nimbus Core
//! 
//! Domain entities, the storage port, and the identity services: user
//! store, auth orchestration, and sandboxed diagnostics.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

pub use domain::*;
pub use error::DomainError;

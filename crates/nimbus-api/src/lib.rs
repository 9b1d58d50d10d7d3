//! # Nimbus API
//! 
//! HTTP adapter over the identity services: form handlers, cookie
//! plumbing, and the JSON response envelope.

pub mod cookies;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

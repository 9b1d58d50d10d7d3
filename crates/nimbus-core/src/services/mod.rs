//! Domain services (business logic)

pub mod user_store;
pub mod auth_service;
pub mod diagnostics_service;

pub use user_store::UserStore;
pub use auth_service::{AuthOutcome, AuthService, LogoutOutcome};
pub use diagnostics_service::DiagnosticsService;

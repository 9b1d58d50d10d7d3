//! # Nimbus Security
//! 
//! Credential hashing, session tokens and registry, cookie directives, and
//! the sandboxed diagnostics executor.

pub mod password;
pub mod token;
pub mod cookie;
pub mod session;
pub mod sandbox;

pub use password::{hasher_for, Argon2Hasher, CredentialHasher, PasswordError, Sha256Hasher};
pub use cookie::{CookieDirective, SameSite};
pub use session::{SessionIdentity, SessionRegistry};
pub use sandbox::{CommandPolicy, CommandValidator, DiagnosticReport, SandboxError, SandboxedExecutor};

//! Credential hashing

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use nimbus_shared::config::HasherKind;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

/// One-way transform from a plaintext credential to a stored digest.
pub trait CredentialHasher: Send + Sync {
    fn digest(&self, secret: &str) -> Result<String, PasswordError>;

    /// Recomputes and compares. A digest this hasher can't parse is a mismatch.
    fn verify(&self, secret: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// Unsalted single-pass SHA-256, lower-case hex.
///
/// Deterministic, which is what makes it precomputable. Kept as the default
/// because existing user files carry these digests; see [`Argon2Hasher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl CredentialHasher for Sha256Hasher {
    fn digest(&self, secret: &str) -> Result<String, PasswordError> {
        Ok(hex::encode(Sha256::digest(secret.as_bytes())))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, PasswordError> {
        Ok(self.digest(secret)? == digest)
    }
}

/// Salted Argon2id, PHC string output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn digest(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(hash) => hash,
            Err(_) => return Ok(false),
        };
        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

pub fn hasher_for(kind: HasherKind) -> Arc<dyn CredentialHasher> {
    match kind {
        HasherKind::Sha256 => Arc::new(Sha256Hasher),
        HasherKind::Argon2 => Arc::new(Argon2Hasher),
    }
}

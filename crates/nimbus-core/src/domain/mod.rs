//! # Nimbus Core - Domain Module

pub mod user;

pub use user::{PublicProfile, RegisterInput, User};

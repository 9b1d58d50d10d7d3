//! HTTP handlers

pub mod auth;
pub mod diagnostics;
pub mod health;

//! # Nimbus Shared
//! 
//! Shared configuration, constants, telemetry, and small helpers for the
//! Nimbus identity service.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use error::AppError;

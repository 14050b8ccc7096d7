//! Shared types, errors, and configuration for the budget report engine.
//!
//! This crate provides common types used across all other crates:
//! - pt-BR money and percentage formatting
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CacheBackend};
pub use error::{AppError, AppResult};
pub use types::{Money, Percent, SignedPercent};

//! Shared utilities, configuration, and error handling for Threadline
//!
//! This crate provides common functionality used across the Threadline backend:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Repository and state machine error types
//! - The validating JSON extractor

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::{Config, StoreProvider};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use state::StateError;

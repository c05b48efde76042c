//! Changeguard Core - Core library for changelog validation
//!
//! This crate provides the error types and configuration system shared by
//! the changelog parser and the CLI.

pub mod config;
pub mod error;

pub use config::{Config, IssueRefPolicy};
pub use error::{ChangeguardError, ChangelogError, ConfigError, Result};

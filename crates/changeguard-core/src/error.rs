//! Error types for Changeguard

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ChangeguardError
pub type Result<T> = std::result::Result<T, ChangeguardError>;

/// Main error type for Changeguard operations
#[derive(Debug, Error)]
pub enum ChangeguardError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Changelog file not found
    #[error("Changelog file not found at {0}")]
    FileNotFound(PathBuf),

    /// The changelog does not follow the expected format
    #[error("Changelog {} has {} problem(s):\n{}", .path.display(), .errors.len(), .errors.join("\n"))]
    Invalid { path: PathBuf, errors: Vec<String> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChangeguardError {
    /// True when the error came from configuration loading or validation
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// True when the changelog itself failed validation
    pub fn is_invalid_changelog(&self) -> bool {
        matches!(self, Self::Changelog(ChangelogError::Invalid { .. }))
    }
}

//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for Changeguard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version of the config schema
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path, relative to the working directory
    pub file: PathBuf,

    /// How entries without a trailing issue reference are reported
    pub issue_refs: IssueRefPolicy,

    /// Whether the first release must be "Unreleased"
    pub require_unreleased: bool,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
            issue_refs: IssueRefPolicy::default(),
            require_unreleased: false,
        }
    }
}

/// Policy for changelog entries that lack an issue reference such as `#PROJ-123`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueRefPolicy {
    /// Don't check
    #[default]
    Ignore,
    /// Report as a warning
    Warn,
    /// Report as an error
    Require,
}

//! Reading changelogs from disk

use std::path::Path;

use changeguard_core::{ChangelogError, Result};
use tracing::{info, warn};

use crate::parser::parse_changelog;
use crate::types::Changelog;

/// Read and parse the changelog at `path`
pub fn load_changelog(path: &Path) -> Result<Changelog> {
    info!(path = %path.display(), "loading changelog");

    if !path.exists() {
        return Err(ChangelogError::FileNotFound(path.to_path_buf()).into());
    }
    let text = std::fs::read_to_string(path).map_err(ChangelogError::Io)?;

    parse_changelog(&text).map_err(|errors| {
        warn!(path = %path.display(), errors = errors.len(), "changelog failed validation");
        ChangelogError::Invalid {
            path: path.to_path_buf(),
            errors: errors.into_vec(),
        }
        .into()
    })
}

//! CLI commands

mod check;
mod completions;
mod init;
mod releases;
mod show;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use releases::ReleasesCommand;
pub use show::ShowCommand;

use std::path::{Path, PathBuf};

use changeguard_core::config::{load_config_or_default, Config};

/// Configuration for the working directory plus the changelog path to use.
///
/// An explicit `--file` wins over the configured `changelog.file`.
pub(crate) fn resolve_changelog(
    cwd: &Path,
    file: Option<&PathBuf>,
) -> anyhow::Result<(Config, PathBuf)> {
    let (config, _) = load_config_or_default(cwd)?;
    let path = match file {
        Some(file) => cwd.join(file),
        None => cwd.join(&config.changelog.file),
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_uses_configured_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("changeguard.yaml"),
            "changelog:\n  file: docs/CHANGES.md\n",
        )
        .unwrap();

        let (_, path) = resolve_changelog(temp.path(), None).unwrap();
        assert_eq!(path, temp.path().join("docs/CHANGES.md"));
    }

    #[test]
    fn test_resolve_prefers_explicit_file() {
        let temp = TempDir::new().unwrap();
        let explicit = PathBuf::from("OTHER.md");
        let (_, path) = resolve_changelog(temp.path(), Some(&explicit)).unwrap();
        assert_eq!(path, temp.path().join("OTHER.md"));
    }
}

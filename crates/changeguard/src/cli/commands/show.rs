//! Show command

use std::path::PathBuf;

use clap::Args;
use semver::Version;
use tracing::info;

use changeguard_changelog::{load_changelog, Changelog, Release};

use super::resolve_changelog;
use crate::cli::{Cli, OutputFormat};

/// Print the text of one release
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Release version, or "unreleased"
    pub release: String,

    /// Changelog file (defaults to the configured changelog file)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl ShowCommand {
    /// Execute the show command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(release = %self.release, "executing show command");
        let cwd = std::env::current_dir()?;
        let (_, path) = resolve_changelog(&cwd, self.file.as_ref())?;
        let changelog = load_changelog(&path)?;

        let Some(release) = self.find(&changelog)? else {
            anyhow::bail!("Release {} not found in {}", self.release, path.display());
        };

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(release)?),
            OutputFormat::Text => print!("{}", changelog.text(release.offset)),
        }

        Ok(())
    }

    /// Look up the requested release. `unreleased` matches in any case and a
    /// leading `v` on versions is ignored.
    pub fn find<'a>(&self, changelog: &'a Changelog) -> anyhow::Result<Option<&'a Release>> {
        if self.release.eq_ignore_ascii_case("unreleased") {
            return Ok(changelog.unreleased());
        }
        let version = Version::parse(self.release.trim_start_matches('v'))?;
        Ok(changelog.find_release(&version))
    }
}

//! Releases command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use changeguard_changelog::{load_changelog, Changelog, Release};

use super::resolve_changelog;
use crate::cli::{output, Cli, OutputFormat};

/// List the releases in the changelog
#[derive(Debug, Args)]
pub struct ReleasesCommand {
    /// Changelog file (defaults to the configured changelog file)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Only show the first N releases
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl ReleasesCommand {
    /// Execute the releases command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(file = ?self.file, limit = ?self.limit, "executing releases command");
        let cwd = std::env::current_dir()?;
        let (_, path) = resolve_changelog(&cwd, self.file.as_ref())?;
        let changelog = load_changelog(&path)?;

        let releases = self.select(&changelog);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(releases)?);
            }
            OutputFormat::Text => {
                if releases.is_empty() {
                    if !cli.quiet {
                        println!("{}", style("No releases found.").yellow());
                    }
                    return Ok(());
                }
                for release in releases {
                    println!("{}", release_title(release));
                    if cli.verbose {
                        println!(
                            "{}",
                            output::key_value(
                                "span",
                                &format!("{}..={}", release.offset.start, release.offset.end)
                            )
                        );
                    }
                    for section in release.sections() {
                        println!(
                            "{}",
                            output::key_value(section.name.as_str(), &section.items.len().to_string())
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// The releases to list, newest first, honouring `--limit`
    pub fn select<'a>(&self, changelog: &'a Changelog) -> &'a [Release] {
        let count = changelog.releases.len();
        &changelog.releases[..self.limit.map_or(count, |limit| limit.min(count))]
    }
}

/// One-line summary of a release, e.g. `5.6.2 (2020-12-08)`
fn release_title(release: &Release) -> String {
    match &release.meta {
        Some(meta) => format!(
            "{} ({})",
            output::version_style().apply_to(&meta.version),
            meta.date.format("%Y-%m-%d")
        ),
        None => style("Unreleased").yellow().bold().to_string(),
    }
}

//! Check command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use changeguard_changelog::{check_policy, load_changelog};
use changeguard_core::{ChangeguardError, ChangelogError};

use super::resolve_changelog;
use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes;

/// Validate the changelog
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Changelog file (defaults to the configured changelog file)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Outcome of checking one changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    pub file: String,
    pub releases: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckReport {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.valid {
            exit_codes::SUCCESS
        } else {
            exit_codes::VALIDATION_ERROR
        }
    }
}

impl CheckCommand {
    /// Execute the check command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(file = ?self.file, strict = self.strict, "executing check command");
        let cwd = std::env::current_dir()?;
        let report = self.report(&cwd)?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_report(&report);
                }
            }
        }

        if !report.valid {
            std::process::exit(report.exit_code());
        }

        Ok(())
    }

    /// Parse the changelog under `cwd` and apply the configured policies
    pub fn report(&self, cwd: &Path) -> anyhow::Result<CheckReport> {
        let (config, path) = resolve_changelog(cwd, self.file.as_ref())?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut releases = 0;

        match load_changelog(&path) {
            Ok(changelog) => {
                releases = changelog.releases.len();
                let report = check_policy(&changelog, &config.changelog);
                errors.extend(report.errors);
                warnings.extend(report.warnings);
            }
            Err(ChangeguardError::Changelog(ChangelogError::Invalid { errors: found, .. })) => {
                errors.extend(found);
            }
            Err(e) => return Err(e.into()),
        }

        if self.strict {
            errors.append(&mut warnings);
        }

        Ok(CheckReport {
            valid: errors.is_empty(),
            file: path.to_string_lossy().into_owned(),
            releases,
            errors,
            warnings,
        })
    }
}

fn print_report(report: &CheckReport) {
    println!(
        "{} {}",
        output::header("Checking"),
        output::path_style().apply_to(&report.file)
    );
    println!();

    if !report.errors.is_empty() {
        println!("{}", style("Errors:").red().bold());
        for error in &report.errors {
            println!("  {} {}", style("✗").red(), error);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("{}", style("Warnings:").yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", style("!").yellow(), warning);
        }
        println!();
    }

    if report.valid {
        let summary = format!("Changelog is valid ({} release(s))", report.releases);
        if report.warnings.is_empty() {
            output::success(&summary);
        } else {
            output::success(&format!(
                "{summary} with {} warning(s)",
                report.warnings.len()
            ));
        }
    } else {
        println!(
            "{} with {} error(s)",
            style("✗ Validation failed").red().bold(),
            report.errors.len()
        );
    }
}

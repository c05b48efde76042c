//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{CheckCommand, CompletionsCommand, InitCommand, ReleasesCommand, ShowCommand};

/// Changeguard - Keep a Changelog validation CLI
#[derive(Debug, Parser)]
#[command(name = "changeguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the changelog
    Check(CheckCommand),

    /// List the releases in the changelog
    Releases(ReleasesCommand),

    /// Print the text of one release
    Show(ShowCommand),

    /// Write a default Changeguard configuration
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Check(ref cmd) => cmd.execute(&self),
            Commands::Releases(ref cmd) => cmd.execute(&self),
            Commands::Show(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_global_flags() {
        let cli = Cli::try_parse_from([
            "changeguard",
            "check",
            "--strict",
            "--format",
            "json",
            "-C",
            "repo",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.directory, Some(std::path::PathBuf::from("repo")));
        assert!(matches!(cli.command, Commands::Check(ref c) if c.strict));
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from(["changeguard", "show", "1.2.3"]).unwrap();
        assert!(matches!(cli.command, Commands::Show(ref c) if c.release == "1.2.3"));
    }
}

//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use lendlens_domain::DocumentClass;
use std::path::PathBuf;

/// LendLens CLI - Validate credit reports, appraisals, and title documents.
#[derive(Debug, Parser)]
#[command(name = "lendlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Gemini API key
    #[arg(long, global = true, env = "LENDLENS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Debug logging for LendLens crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (headline values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a credit report
    Credit(AnalyzeArgs),

    /// Analyze a property appraisal
    Appraisal(AnalyzeArgs),

    /// Validate a title document
    Title(AnalyzeArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

impl Command {
    /// Document class for the analysis commands
    pub fn class(&self) -> Option<DocumentClass> {
        match self {
            Command::Credit(_) => Some(DocumentClass::Credit),
            Command::Appraisal(_) => Some(DocumentClass::Appraisal),
            Command::Title(_) => Some(DocumentClass::Title),
            Command::Profile(_) | Command::Repl => None,
        }
    }
}

/// Arguments shared by the analysis commands.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// PDF or XML document
    pub file: PathBuf,

    /// MIME type to send instead of guessing from the extension
    #[arg(short, long)]
    pub mime: Option<String>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Model identifier (e.g. gemini-2.5-flash)
        #[arg(short, long)]
        model: String,
        /// API base URL
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Per-request timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::try_parse_from(["lendlens"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_credit_command() {
        let cli = Cli::try_parse_from(["lendlens", "credit", "report.pdf"]).unwrap();
        match cli.command {
            Some(Command::Credit(ref args)) => {
                assert_eq!(args.file, PathBuf::from("report.pdf"));
                assert!(args.mime.is_none());
            }
            _ => panic!("Expected Credit command"),
        }
        assert_eq!(cli.command.unwrap().class(), Some(DocumentClass::Credit));
    }

    #[test]
    fn test_title_with_mime_and_global_flags() {
        let cli = Cli::try_parse_from([
            "lendlens", "title", "deed.bin", "--mime", "text/xml", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Title(args)) => assert_eq!(args.mime.as_deref(), Some("text/xml")),
            _ => panic!("Expected Title command"),
        }
    }

    #[test]
    fn test_analysis_requires_file() {
        assert!(Cli::try_parse_from(["lendlens", "appraisal"]).is_err());
    }

    #[test]
    fn test_profile_set_requires_model() {
        assert!(Cli::try_parse_from(["lendlens", "profile", "set", "pro"]).is_err());

        let cli = Cli::try_parse_from([
            "lendlens", "profile", "set", "pro", "--model", "gemini-2.5-pro", "--timeout", "60",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Profile(ProfileArgs {
                action: ProfileAction::Set { name, model, endpoint, timeout },
            })) => {
                assert_eq!(name, "pro");
                assert_eq!(model, "gemini-2.5-pro");
                assert!(endpoint.is_none());
                assert_eq!(timeout, Some(60));
            }
            _ => panic!("Expected profile set"),
        }
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Quiet.into();
        assert_eq!(format, crate::config::OutputFormat::Quiet);
    }
}

//! LendLens CLI - AI-assisted validation of lending documents.

use clap::Parser;
use lendlens_analyzer::Analyzer;
use lendlens_cli::commands;
use lendlens_cli::repl;
use lendlens_cli::{Cli, Command, Config, Formatter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERBOSE_FILTER: &str = "warn,lendlens_cli=debug,lendlens_analyzer=debug,lendlens_llm=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_tracing(verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let Some(reason) = e.reason().filter(|_| verbose) {
            eprintln!("  caused by: {}", reason);
        }
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> lendlens_cli::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let command = match cli.command {
        Some(Command::Profile(args)) => {
            return commands::execute_profile(args, &mut config, &formatter);
        }
        other => other,
    };

    let profile = config.get_active_profile()?;
    debug!(profile = %config.active_profile, model = %profile.model, "Using profile");
    let provider = commands::build_provider(profile, cli.api_key.as_deref())?;
    let analyzer = Analyzer::new(provider);

    let class = command.as_ref().and_then(Command::class);
    match (class, command) {
        (
            Some(class),
            Some(Command::Credit(args) | Command::Appraisal(args) | Command::Title(args)),
        ) => {
            commands::execute_analyze(class, args, &analyzer, &formatter).await?;
        }
        _ => {
            repl::run_repl(analyzer, &config, &formatter).await?;
        }
    }

    Ok(())
}

//! Sign-up CLI
//!
//! Registers an online judge account from the terminal: validates each
//! field, checks user ID availability and submits the registration.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use signup_core::Config;

#[derive(Parser)]
#[command(name = "signup")]
#[command(author, version, about = "Online judge account sign-up CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Override the API base URL (or set SIGNUP_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Load majors from a JSON file (or set SIGNUP_MAJORS_FILE)
    #[arg(long, global = true)]
    majors_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register(commands::register::RegisterArgs),

    /// Check whether a user ID is still free
    Check(commands::check::CheckArgs),

    /// Validate field values without contacting the server
    Validate(commands::validate::ValidateArgs),

    /// List or search the selectable majors
    Majors(commands::majors::MajorsArgs),

    /// Show the effective configuration
    Config,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url.as_str());
    }
    if let Some(path) = &cli.majors_file {
        config = config.with_majors_file(path)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&cli)?;
    log::debug!("[signup:cli] Using API at {}", config.api_url);

    let ctx = commands::Context {
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Register(args) => commands::register::execute(&ctx, args).await,
        Commands::Check(args) => commands::check::execute(&ctx, args).await,
        Commands::Validate(args) => commands::validate::execute(&ctx, args).await,
        Commands::Majors(args) => commands::majors::execute(&ctx, args).await,
        Commands::Config => commands::config::execute(&ctx).await,
    }
}

//! gatekeeper - security manager command line front end
//!
//! Wires the security manager with the static authenticator, the in-memory
//! session store and, when configured, the cookie remember-me provider, then
//! runs a single caller flow. Results are printed to stdout as JSON; logs go to
//! stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod config;
mod runtime;

use config::AppConfig;

/// gatekeeper - subject resolution and login/logout front end
#[derive(Parser, Debug)]
#[command(name = "gatekeeper")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file. `GATEKEEPER__` environment
    /// variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration and print the effective settings
    CheckConfig,

    /// Log in within a fresh session and print the resulting subject
    Login(commands::LoginArgs),

    /// Resolve the subject from ambient clues such as a remember-me cookie
    Whoami(commands::WhoamiArgs),
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let cfg = AppConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::CheckConfig => commands::check_config(&cfg),
        Commands::Login(args) => commands::login(&cfg, args).await,
        Commands::Whoami(args) => commands::whoami(&cfg, args).await,
    }
}

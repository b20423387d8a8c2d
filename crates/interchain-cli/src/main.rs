//! `interchain` - migrates CosmJS code to InterchainJS from the command line
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::print_stdout,
        clippy::print_stderr,
        reason = "Allow for tests"
    )
)]

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

mod cli;
mod config;
mod handlers;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "interchain=debug" } else { "interchain=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let code = match cli.command {
        Commands::Migrate { files, dry_run } => {
            handlers::handle_migrate(&config, &files, dry_run).await
        }
        Commands::Check { files } => handlers::handle_check(&config, &files).await,
        Commands::Tools => handlers::handle_tools(&config),
    };

    Ok(code)
}

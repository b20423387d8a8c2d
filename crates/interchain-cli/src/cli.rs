use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interchain")]
#[command(about = "Migrates CosmJS code to InterchainJS", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Configuration file (default: ./interchain.toml if present)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log rule matches and diagnostics")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Rewrite files in place")]
    Migrate {
        #[arg(required = true, help = "Files to migrate")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Print the migrated code instead of writing it")]
        dry_run: bool,
    },

    #[command(about = "Report files that still use CosmJS, without writing")]
    Check {
        #[arg(required = true, help = "Files to check")]
        files: Vec<PathBuf>,
    },

    #[command(about = "List the migration tools and their descriptions")]
    Tools,
}

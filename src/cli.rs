use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sqlopen")]
#[command(about = "Open database connections from URLs", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $SQLOPEN_CONFIG or config/sqlopen.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered drivers
    Drivers(DriversArgs),
    /// Show which driver would handle a URL or configured database
    Which(TargetArgs),
    /// Open a connection, ping it and close it
    Ping(TargetArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
pub struct DriversArgs {
    /// Print as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct TargetArgs {
    /// Connection URL or name of a configured database
    pub target: String,
}

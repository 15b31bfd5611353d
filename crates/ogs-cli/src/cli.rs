use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ogs",
    about = "OpenGraph schema sync: plan and apply graph schema extensions",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Service configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what applying a schema would change
    Plan(SchemaArgs),
    /// Upsert a schema into the state file
    Apply(SchemaArgs),
    /// Print a stored extension with everything it owns
    Show(ShowArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Desired graph schema (JSON)
    #[arg(short, long)]
    pub schema: PathBuf,
    /// Stored state snapshot (JSON); a missing file is an empty store
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Extension name
    pub name: String,
    #[arg(long)]
    pub state: PathBuf,
}

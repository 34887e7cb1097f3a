use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forksh", version, about = "forksh: evaluate parsed command trees")]
pub struct Cli {
    /// Config file (defaults to ./forksh.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a command tree (.json or .toml) and exit with its status
    Run { tree: PathBuf },

    /// Print a command tree and check that its external verbs resolve on PATH
    Check { tree: PathBuf },
}

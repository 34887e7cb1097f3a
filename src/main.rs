mod cli;
mod config;
mod engine;
mod handlers;
mod logger;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use handlers::{check, run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    logger::init(&config.log);

    let status = match cli.command {
        Commands::Run { tree } => run::handle_run(&tree, &config)?,
        Commands::Check { tree } => check::handle_check(&tree)?,
    };
    engine::process::flush_std();
    std::process::exit(status);
}

use anyhow::Context;
use clap::Parser;
use kube_tadm::{cli::Cli, config, run_command};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = match &cli.config {
        Some(path) => config::load_config_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().ok();
            config::load_config(cwd.as_deref()).context("Failed to load configuration")?
        }
    };

    // Execute command
    run_command(cli.command, config)?;
    Ok(())
}

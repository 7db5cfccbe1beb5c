//! Main entry point for the mpm CLI

use clap::Parser;
use mpm_cli::{Cli, CliRunner};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    std::env::set_var("RUST_LOG", log_level);
    env_logger::init();

    match CliRunner::new(&cli) {
        Ok(runner) => {
            if let Err(e) = runner.run(&cli.command) {
                log::error!("Command failed: {}", e);
                return Err(e);
            }
        }
        Err(e) => {
            log::error!("Failed to initialize: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

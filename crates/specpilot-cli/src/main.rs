//! SpecPilot CLI entry point.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use specpilot_cli::cli::Cli;
use specpilot_cli::commands;
use specpilot_core::config::load_dotenv;
use specpilot_core::Settings;

fn main() {
    let loaded = load_dotenv();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    fmt().with_env_filter(filter).with_target(false).init();

    for path in &loaded {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let result = match Settings::from_env() {
        Ok(settings) => commands::execute(cli.command, settings),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

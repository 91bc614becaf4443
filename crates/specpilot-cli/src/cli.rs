//! Command-line interface definition using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Crates whose log level follows `-v`.
const LOG_TARGETS: &[&str] = &[
    "specpilot",
    "specpilot_core",
    "specpilot_agent",
    "specpilot_persistence",
    "specpilot_orchestrator",
    "specpilot_api",
    "specpilot_cli",
];

fn version_string() -> &'static str {
    static VERSION: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION.get_or_init(|| {
        format!(
            "{} ({}, {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH"),
            env!("BUILD_DATE")
        )
    })
}

/// SpecPilot - turn a project idea into an SRS through a short interview
#[derive(Parser, Debug)]
#[command(name = "specpilot")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the REST API server (default)
    Serve {
        /// Address to bind
        #[arg(long, env = "SPECPILOT_HOST")]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long, env = "SPECPILOT_PORT")]
        port: Option<u16>,
    },

    /// Describe a project interactively and receive an SRS
    Chat {
        /// Write the finished SRS (Markdown) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a scripted conversation end to end
    Demo {
        #[arg(value_enum, default_value = "ecommerce")]
        scenario: DemoScenario,

        /// Run every scenario in turn
        #[arg(long, conflicts_with = "scenario")]
        all: bool,

        /// Write the finished SRS (Markdown) to this file; with --all, a
        /// directory receiving one file per scenario
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DemoScenario {
    #[default]
    Ecommerce,
    Booking,
    Intranet,
    Chat,
    Iot,
}

impl Cli {
    fn is_interactive(&self) -> bool {
        matches!(
            self.command,
            Some(Commands::Chat { .. }) | Some(Commands::Demo { .. })
        )
    }

    /// Log level selected by `-v`. Interactive commands stay quiet by default.
    pub fn log_level(&self) -> tracing::Level {
        match (self.verbose, self.is_interactive()) {
            (0, true) => tracing::Level::WARN,
            (0, false) => tracing::Level::INFO,
            (1, _) => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> String {
        let level = self.log_level().to_string().to_lowercase();
        let mut directives = vec!["warn".to_string()];
        directives.extend(LOG_TARGETS.iter().map(|t| format!("{}={}", t, level)));
        if self.verbose >= 2 {
            directives.push("tower_http=debug".to_string());
        }
        directives.join(",")
    }
}

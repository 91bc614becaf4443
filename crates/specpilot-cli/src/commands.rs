//! Command handlers for CLI subcommands.

use std::fs;
use std::path::Path;

use specpilot_api::{serve, ApiConfig, AppState};
use specpilot_core::{to_markdown, Settings};
use specpilot_orchestrator::{SessionService, SessionSnapshot};
use tokio::runtime::Runtime;
use tracing::info;

use crate::cli::{Commands, DemoScenario};
use crate::demo;
use crate::repl::ChatRepl;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command; `None` runs the server.
pub fn execute(command: Option<Commands>, settings: Settings) -> Result<()> {
    match command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => cmd_serve(settings, host, port),
        Commands::Chat { output } => cmd_chat(&settings, output.as_deref()),
        Commands::Demo {
            scenario,
            all,
            output,
        } => cmd_demo(&settings, scenario, all, output.as_deref()),
    }
}

fn cmd_serve(mut settings: Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    if !settings.has_credential() {
        info!("No provider credential configured, agents will use canned fallbacks");
    }

    let state = AppState::new(
        ApiConfig::from_settings(&settings),
        SessionService::from_settings(&settings),
    );
    let runtime = Runtime::new()?;
    runtime.block_on(serve(state))?;
    Ok(())
}

fn cmd_chat(settings: &Settings, output: Option<&Path>) -> Result<()> {
    let mut repl = ChatRepl::new(SessionService::from_settings(settings))?;
    repl.run(output)
}

fn cmd_demo(
    settings: &Settings,
    scenario: DemoScenario,
    all: bool,
    output: Option<&Path>,
) -> Result<()> {
    let service = SessionService::from_settings(settings);
    let runtime = Runtime::new()?;
    if all {
        runtime.block_on(demo::run_all(&service, true, output))?;
        return Ok(());
    }
    let snapshot = runtime.block_on(demo::run(&service, scenario, true))?;
    print_outcome(&snapshot, output)
}

/// Prints the SRS of a finished session and optionally saves it.
pub fn print_outcome(snapshot: &SessionSnapshot, output: Option<&Path>) -> Result<()> {
    let Some(document) = &snapshot.final_srs else {
        println!(
            "\nSession {} is not complete yet ({} passes).",
            snapshot.session_id, snapshot.iteration_count
        );
        return Ok(());
    };

    let markdown = to_markdown(document);
    println!("\n{}", markdown);
    if let Some(path) = output {
        fs::write(path, &markdown)?;
        println!("SRS saved to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use specpilot_models::{RequirementState, SessionId};
    use specpilot_orchestrator::Workflow;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_print_outcome_writes_markdown() {
        let service = SessionService::in_memory(Workflow::stub(10));
        let snapshot = demo::run(&service, DemoScenario::Chat, false).await.unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("srs.md");
        print_outcome(&snapshot, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("## 기능 요구사항"));
    }

    #[test]
    fn test_incomplete_session_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("srs.md");
        let snapshot = SessionSnapshot::new(SessionId::from("s"), &RequirementState::new());

        print_outcome(&snapshot, Some(&path)).unwrap();
        assert!(!path.exists());
    }
}

//! Interactive requirements interview.

use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use specpilot_models::{Category, SessionId};
use specpilot_orchestrator::{SessionService, SessionSnapshot};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::commands::{print_outcome, Result};

/// Commands understood by the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Quit,
    Status,
    Info,
    Help,
    /// Anything else is sent to the session.
    Say(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(match line {
            "/quit" | "/exit" | "/q" => Self::Quit,
            "/status" => Self::Status,
            "/info" => Self::Info,
            "/help" | "/?" => Self::Help,
            text => Self::Say(text.to_string()),
        })
    }
}

const HELP: &str = "\
Commands:
  /status   iteration count and completeness
  /info     information collected so far
  /quit     leave the interview";

pub struct ChatRepl {
    editor: DefaultEditor,
    runtime: Runtime,
    service: SessionService,
    session: Option<SessionId>,
}

impl ChatRepl {
    pub fn new(service: SessionService) -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            runtime: Runtime::new()?,
            service,
            session: None,
        })
    }

    pub fn run(&mut self, output: Option<&Path>) -> Result<()> {
        println!("SpecPilot - describe the project you want to build. /help for commands.");
        println!("Provider: {}\n", self.service.workflow().provider_name());

        loop {
            let prompt = if self.session.is_some() { "answer> " } else { "project> " };
            let line = match self.editor.readline(prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            let Some(command) = ChatCommand::parse(&line) else {
                continue;
            };
            self.editor.add_history_entry(line.as_str())?;

            match command {
                ChatCommand::Quit => break,
                ChatCommand::Help => println!("{}", HELP),
                ChatCommand::Status => self.show_status(),
                ChatCommand::Info => self.show_info(),
                ChatCommand::Say(text) => {
                    let Some(snapshot) = self.submit(&text) else {
                        continue;
                    };
                    if snapshot.is_complete {
                        if let Some(feedback) = &snapshot.judge_feedback {
                            println!("⚖️  {}", feedback);
                        }
                        print_outcome(&snapshot, output)?;
                        break;
                    }
                    for question in &snapshot.questions {
                        println!("🤖 {}", question);
                    }
                }
            }
        }
        Ok(())
    }

    /// Starts or continues the session; errors are printed, not returned.
    fn submit(&mut self, text: &str) -> Option<SessionSnapshot> {
        let result = match &self.session {
            None => self.runtime.block_on(self.service.start_session(text)),
            Some(id) => self.runtime.block_on(self.service.continue_session(id, text)),
        };
        match result {
            Ok(snapshot) => {
                debug!(
                    session_id = %snapshot.session_id,
                    iteration = snapshot.iteration_count,
                    "Pass done"
                );
                self.session = Some(snapshot.session_id.clone());
                Some(snapshot)
            }
            Err(e) => {
                println!("⚠️  {}", e);
                None
            }
        }
    }

    fn show_status(&self) {
        let Some(id) = &self.session else {
            println!("No session yet.");
            return;
        };
        let status = self.runtime.block_on(self.service.status(id));
        let quality = self.runtime.block_on(self.service.quality(id));
        match (status, quality) {
            (Ok(status), Ok(quality)) => {
                println!(
                    "Session {} | pass {} | complete: {} | completeness {:.0}%",
                    id,
                    status.iteration_count,
                    status.is_complete,
                    quality.completeness * 100.0
                );
                if !quality.missing.is_empty() {
                    println!("Missing: {}", quality.missing.join(", "));
                }
            }
            (Err(e), _) | (_, Err(e)) => println!("⚠️  {}", e),
        }
    }

    fn show_info(&self) {
        let Some(id) = &self.session else {
            println!("No session yet.");
            return;
        };
        match self.runtime.block_on(self.service.collected_info(id)) {
            Ok(view) => {
                let info = view.collected_info;
                let mut any = false;
                for category in Category::ALL {
                    if let Some(value) = info.get(category) {
                        println!("  {}: {}", category.label(), value);
                        any = true;
                    }
                }
                if !any {
                    println!("Nothing collected yet.");
                }
            }
            Err(e) => println!("⚠️  {}", e),
        }
    }
}

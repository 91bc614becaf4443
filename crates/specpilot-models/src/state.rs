//! Per-session requirement state.

use serde::{Deserialize, Serialize};

use crate::info::CollectedInfo;
use crate::message::Message;
use crate::srs::SrsDocument;

/// Coarse phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Still asking questions.
    Gathering,
    /// Judge approved (or the ceiling was hit); terminal until reset.
    Complete,
}

/// The full mutable record of one session.
///
/// `is_complete` is a one-way latch: once set it is only cleared by
/// discarding the whole state. `final_srs` is present only after the
/// writer ran on a complete state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementState {
    /// Most recent raw input.
    pub user_input: String,

    /// Full transcript, append-only.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Information collected so far.
    #[serde(default)]
    pub collected_info: CollectedInfo,

    /// Question(s) pending for the user.
    #[serde(default)]
    pub questions: Vec<String>,

    /// Terminal completion flag.
    #[serde(default)]
    pub is_complete: bool,

    /// Rationale of the last judge decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_feedback: Option<String>,

    /// Final document, once written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_srs: Option<SrsDocument>,

    /// Completed orchestration passes.
    #[serde(default)]
    pub iteration_count: u32,
}

impl RequirementState {
    /// Creates an empty state for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase derived from the completion latch.
    pub fn phase(&self) -> SessionPhase {
        if self.is_complete {
            SessionPhase::Complete
        } else {
            SessionPhase::Gathering
        }
    }

    /// Appends a message to the transcript.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the pending questions with a single question.
    pub fn set_question(&mut self, question: impl Into<String>) {
        self.questions = vec![question.into()];
    }

    /// Latches completion with the given feedback.
    pub fn mark_complete(&mut self, feedback: impl Into<String>) {
        self.is_complete = true;
        self.judge_feedback = Some(feedback.into());
    }

    /// Records a rejecting judge decision.
    ///
    /// Has no effect on the completion flag of an already complete state.
    pub fn mark_pending(&mut self, feedback: impl Into<String>) {
        if self.is_complete {
            return;
        }
        self.judge_feedback = Some(feedback.into());
    }

    /// Transcript rendered as `role: content` lines.
    pub fn conversation_history(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The first request of the session, falling back to the latest input.
    pub fn initial_request(&self) -> &str {
        self.collected_info
            .initial_request()
            .unwrap_or(&self.user_input)
    }
}

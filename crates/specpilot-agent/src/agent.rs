//! The `Agent` trait shared by the Consultant, Judge and Writer.

use async_trait::async_trait;
use specpilot_core::ProjectSignals;
use specpilot_models::RequirementState;

use crate::response::StepOutcome;

/// Role of an agent in the orchestrator pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// Asks the next clarifying question.
    Consultant,
    /// Decides whether enough has been collected.
    Judge,
    /// Renders the SRS document.
    Writer,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consultant => write!(f, "consultant"),
            Self::Judge => write!(f, "judge"),
            Self::Writer => write!(f, "writer"),
        }
    }
}

/// One step of an orchestrator pass.
///
/// Agents mutate the state in place and never fail: provider problems are
/// absorbed and reported through [`StepOutcome::Fallback`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// The role this agent plays.
    fn role(&self) -> AgentRole;

    /// Runs the agent against the session state.
    async fn run(&self, state: &mut RequirementState, signals: &ProjectSignals) -> StepOutcome;
}

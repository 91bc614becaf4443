//! LLM gateway and agents for SpecPilot.
//!
//! Every orchestrator pass runs three agents against the session's
//! [`RequirementState`](specpilot_models::RequirementState):
//!
//! - **Consultant**: asks exactly one clarifying question about the
//!   highest-priority missing category
//! - **Judge**: decides whether enough has been collected, with an iteration
//!   ceiling and a mandatory-category veto
//! - **Writer**: renders the SRS document once the session is complete
//!
//! Agents talk to the provider through [`LlmGateway`], which returns a
//! [`Generation`] instead of an error. Provider failures therefore surface
//! as [`StepOutcome::Fallback`] and never abort a pass.
//!
//! # Core Types
//!
//! - [`Agent`]: The trait all three agents implement
//! - [`TextGenerator`]: A text-generation provider (OpenRouter, stub, test doubles)
//! - [`LlmGateway`]: Retry and fallback wrapper around a provider
//! - [`SrsWriter`]: Pure document composer
//! - [`ModelConfig`]: Model, temperature and credential

pub mod agent;
pub mod client;
pub mod config;
pub mod consultant;
pub mod error;
pub mod gateway;
pub mod judge;
pub mod prompts;
pub mod response;
pub mod writer;

pub use agent::{Agent, AgentRole};
pub use client::{ChatMessage, ChatResponse, OpenRouterClient, OPENROUTER_API_KEY_ENV};
pub use config::ModelConfig;
pub use consultant::{extract_question, Consultant, Topic, DEFAULT_QUESTION};
pub use error::{AgentError, Result};
pub use gateway::{
    FallbackReason, Generation, LlmGateway, RetryPolicy, StubGenerator, TextGenerator,
    STUB_RESPONSE,
};
pub use judge::{parse_verdict, Decision, Judge, Verdict, APPROVED_FEEDBACK, CEILING_FEEDBACK};
pub use response::StepOutcome;
pub use writer::{SrsWriter, Writer};

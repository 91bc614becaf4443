//! Core data models for SpecPilot.
//!
//! This crate provides the data types shared by every layer of the
//! requirements-gathering pipeline: session identifiers, conversation
//! messages, the per-session [`RequirementState`], the fixed-schema
//! [`CollectedInfo`] record and the SRS document value objects.

pub mod ids;
pub mod info;
pub mod message;
pub mod srs;
pub mod state;

// Re-export main types
pub use ids::SessionId;
pub use info::{Category, CollectedInfo, ExtractedInfo, INITIAL_REQUEST_KEY};
pub use message::{Message, MessageRole};
pub use srs::{FunctionalRequirement, GherkinScenario, Priority, SrsDocument, TechStackRecommendation};
pub use state::{RequirementState, SessionPhase};

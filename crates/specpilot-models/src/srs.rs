//! Software Requirements Specification document types.
//!
//! An [`SrsDocument`] is an immutable snapshot produced by the writer. It is
//! never patched incrementally; each write recomputes the whole document.

use serde::{Deserialize, Serialize};

/// Priority of a functional requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// A functional requirement (`FR-001`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalRequirement {
    /// Requirement id, e.g. `FR-001`.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Priority.
    pub priority: Priority,
    /// Suggested technologies.
    #[serde(default)]
    pub tech_suggestions: Vec<String>,
}

/// A recommended technology group with its rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStackRecommendation {
    /// Category, e.g. `Backend`, `DevOps`.
    pub category: String,
    /// Recommended technologies.
    pub technologies: Vec<String>,
    /// Why these were chosen.
    pub rationale: String,
}

/// A Gherkin-style acceptance scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GherkinScenario {
    pub feature: String,
    pub scenario: String,
    pub given: String,
    pub when: String,
    pub then: String,
}

/// The final SRS document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrsDocument {
    /// Project name.
    pub project_name: String,
    /// Overview paragraph plus collected-facts bullet list.
    pub overview: String,
    /// Functional requirements, in emission order.
    pub functional_requirements: Vec<FunctionalRequirement>,
    /// Non-functional requirements.
    pub non_functional_requirements: Vec<String>,
    /// Technology recommendations.
    pub tech_stack: Vec<TechStackRecommendation>,
    /// Acceptance scenarios.
    pub test_scenarios: Vec<GherkinScenario>,
    /// Assumptions and constraints.
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl SrsDocument {
    /// Looks up a functional requirement by id.
    pub fn requirement(&self, id: &str) -> Option<&FunctionalRequirement> {
        self.functional_requirements.iter().find(|fr| fr.id == id)
    }
}

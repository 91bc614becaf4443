//! Serializable views returned by the session service.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use specpilot_core::to_markdown;
use specpilot_models::{CollectedInfo, RequirementState, SessionId, SessionPhase, SrsDocument};

/// Session state as returned by start and continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub questions: Vec<String>,
    pub is_complete: bool,
    #[serde(default)]
    pub judge_feedback: Option<String>,
    pub iteration_count: u32,
    #[serde(default)]
    pub final_srs: Option<SrsDocument>,
}

impl SessionSnapshot {
    pub fn new(session_id: SessionId, state: &RequirementState) -> Self {
        Self {
            session_id,
            questions: state.questions.clone(),
            is_complete: state.is_complete,
            judge_feedback: state.judge_feedback.clone(),
            iteration_count: state.iteration_count,
            final_srs: state.final_srs.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub phase: SessionPhase,
    pub is_complete: bool,
    pub iteration_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedInfoView {
    pub session_id: SessionId,
    pub collected_info: CollectedInfo,
}

/// Completeness of a session measured against its mandatory categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityView {
    pub session_id: SessionId,
    pub completeness: f64,
    /// Labels of the mandatory categories still missing.
    pub missing: Vec<String>,
    pub collected: usize,
    pub required: usize,
}

/// Output format of an exported SRS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SrsFormat {
    #[default]
    Json,
    Markdown,
}

impl FromStr for SrsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unsupported format: {}", other)),
        }
    }
}

/// An SRS in the requested format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SrsPayload {
    Document(SrsDocument),
    Markdown(String),
}

impl SrsPayload {
    pub fn render(document: &SrsDocument, format: SrsFormat) -> Self {
        match format {
            SrsFormat::Json => Self::Document(document.clone()),
            SrsFormat::Markdown => Self::Markdown(to_markdown(document)),
        }
    }

    pub fn as_markdown(&self) -> Option<&str> {
        match self {
            Self::Markdown(text) => Some(text),
            Self::Document(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsExport {
    pub session_id: SessionId,
    pub final_srs: Option<SrsPayload>,
    pub is_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<SrsFormat>(), Ok(SrsFormat::Json));
        assert_eq!("Markdown".parse::<SrsFormat>(), Ok(SrsFormat::Markdown));
        assert!("pdf".parse::<SrsFormat>().is_err());
    }

    #[test]
    fn test_snapshot_copies_state() {
        let mut state = RequirementState::new();
        state.set_question("배포 환경은 어디인가요?");
        state.iteration_count = 2;
        let snapshot = SessionSnapshot::new(SessionId::from("abc"), &state);

        assert_eq!(snapshot.session_id.as_str(), "abc");
        assert_eq!(snapshot.questions, state.questions);
        assert_eq!(snapshot.iteration_count, 2);
        assert!(snapshot.final_srs.is_none());
    }
}

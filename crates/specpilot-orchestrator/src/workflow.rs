//! One orchestrator pass over a session state.

use specpilot_agent::{Agent, Consultant, Judge, LlmGateway, StepOutcome, Writer};
use specpilot_core::{InfoExtractor, ProjectSignals, Settings};
use specpilot_models::{Category, Message, RequirementState, INITIAL_REQUEST_KEY};
use tracing::{debug, info};

/// Summary of a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// Iteration count after the pass.
    pub iteration: u32,
    /// Categories filled by this pass's extraction.
    pub extracted: Vec<Category>,
    pub consultant: StepOutcome,
    pub judge: StepOutcome,
    pub writer: StepOutcome,
    /// True if this pass flipped the session to complete.
    pub completed_now: bool,
}

impl PassReport {
    /// True if any agent fell back to canned behaviour.
    pub fn used_fallback(&self) -> bool {
        self.consultant.is_fallback() || self.judge.is_fallback() || self.writer.is_fallback()
    }
}

/// Sequences extraction, Consultant, Judge and Writer.
///
/// Every pass runs in a fixed order: extract, record the turn, append the
/// user message, Consultant, Judge, Writer (only once complete), then bump
/// the iteration count. Agents absorb provider failures, so a pass always
/// finishes with a valid state.
#[derive(Clone)]
pub struct Workflow {
    extractor: InfoExtractor,
    consultant: Consultant,
    judge: Judge,
    writer: Writer,
    provider: String,
}

impl Workflow {
    pub fn new(gateway: LlmGateway, max_iterations: u32) -> Self {
        Self {
            extractor: InfoExtractor::new(),
            provider: gateway.provider_name().to_string(),
            consultant: Consultant::new(gateway.clone()),
            judge: Judge::new(gateway, max_iterations),
            writer: Writer::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(LlmGateway::from_settings(settings), settings.max_iterations)
    }

    /// Workflow over the deterministic stub provider.
    pub fn stub(max_iterations: u32) -> Self {
        Self::new(LlmGateway::stub(), max_iterations)
    }

    /// Name of the text-generation provider behind the agents.
    pub fn provider_name(&self) -> &str {
        &self.provider
    }

    pub fn max_iterations(&self) -> u32 {
        self.judge.max_iterations()
    }

    /// Runs one pass for `input`, mutating `state` in place.
    pub async fn run_pass(&self, state: &mut RequirementState, input: &str) -> PassReport {
        let was_complete = state.is_complete;
        state.user_input = input.to_string();

        let found = self.extractor.extract(input, &state.collected_info);
        let extracted = state.collected_info.apply(found);
        if !extracted.is_empty() {
            debug!(categories = ?extracted, "Extracted requirement categories");
        }

        let backup_key = if state.iteration_count == 0 {
            INITIAL_REQUEST_KEY.to_string()
        } else {
            format!("response_{}", state.iteration_count)
        };
        state.collected_info.record_turn(backup_key, input);
        state.push_message(Message::user(input));

        let signals = ProjectSignals::for_state(state);

        let consultant = self.consultant.run(state, &signals).await;
        let judge = self.judge.run(state, &signals).await;
        let writer = self.writer.run(state, &signals).await;

        state.iteration_count += 1;
        let completed_now = !was_complete && state.is_complete;

        info!(
            iteration = state.iteration_count,
            collected = state.collected_info.category_count(),
            complete = state.is_complete,
            consultant = %consultant,
            judge = %judge,
            "Orchestrator pass finished"
        );

        PassReport {
            iteration: state.iteration_count,
            extracted,
            consultant,
            judge,
            writer,
            completed_now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = "온라인 쇼핑몰을 만들고 싶습니다. 결제와 회원가입 기능이 필요합니다.";

    #[tokio::test]
    async fn test_first_pass_records_initial_request() {
        let workflow = Workflow::stub(10);
        let mut state = RequirementState::new();

        let report = workflow.run_pass(&mut state, REQUEST).await;

        assert_eq!(report.iteration, 1);
        assert_eq!(report.extracted, vec![Category::ProjectType]);
        assert!(report.used_fallback());
        assert!(report.writer.is_skipped());
        assert!(!report.completed_now);

        assert_eq!(state.collected_info.initial_request(), Some(REQUEST));
        assert_eq!(state.collected_info.project_type.as_deref(), Some("이커머스"));
        assert!(state.collected_info.payment.is_none());
        assert!(state.collected_info.authentication.is_none());
        assert_eq!(state.questions.len(), 1);
        assert_eq!(state.messages.len(), 2);
        assert!(state.judge_feedback.is_some());
    }

    #[tokio::test]
    async fn test_later_passes_store_numbered_responses() {
        let workflow = Workflow::stub(10);
        let mut state = RequirementState::new();
        workflow.run_pass(&mut state, REQUEST).await;
        workflow.run_pass(&mut state, "AWS에 배포할 예정입니다").await;

        assert_eq!(
            state.collected_info.extra.get("response_1").map(String::as_str),
            Some("AWS에 배포할 예정입니다")
        );
        assert_eq!(state.collected_info.deployment.as_deref(), Some("AWS"));
        assert_eq!(state.user_input, "AWS에 배포할 예정입니다");
        assert_eq!(state.iteration_count, 2);
    }

    #[tokio::test]
    async fn test_ceiling_forces_completion_and_writes_srs() {
        let workflow = Workflow::stub(3);
        let mut state = RequirementState::new();
        workflow.run_pass(&mut state, "사내 공지사항 게시판을 만들고 싶어요").await;
        workflow.run_pass(&mut state, "잘 모르겠어요").await;
        workflow.run_pass(&mut state, "글쎄요").await;
        assert!(!state.is_complete);

        let report = workflow.run_pass(&mut state, "아직 정하지 않았어요").await;

        assert!(report.completed_now);
        assert!(state.is_complete);
        assert_eq!(state.judge_feedback.as_deref(), Some(specpilot_agent::CEILING_FEEDBACK));
        assert!(state.final_srs.is_some());
        assert_eq!(state.iteration_count, 4);
    }

    #[tokio::test]
    async fn test_completed_state_stays_complete() {
        let workflow = Workflow::stub(1);
        let mut state = RequirementState::new();
        workflow.run_pass(&mut state, "작은 블로그 서비스를 만들고 싶어요").await;
        workflow.run_pass(&mut state, "추가 의견 없음").await;
        assert!(state.is_complete);

        let report = workflow.run_pass(&mut state, "하나 더 알려드릴게요").await;

        assert!(state.is_complete);
        assert!(!report.completed_now);
        assert!(report.judge.is_skipped());
        assert!(state.final_srs.is_some());
        assert_eq!(state.iteration_count, 3);
        assert_eq!(state.questions.len(), 1);
    }
}

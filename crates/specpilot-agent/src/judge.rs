//! Judge agent: decides whether enough has been collected.
//!
//! The checks run in a fixed order:
//! 1. an already complete state is left alone;
//! 2. the iteration ceiling forces completion;
//! 3. the provider's verdict is parsed permissively;
//! 4. the mandatory-category rule can veto an approval.
//!
//! If the provider is unavailable or its reply carries no verdict, the
//! rule-based check decides alone.

use regex::Regex;
use std::sync::OnceLock;

use async_trait::async_trait;
use specpilot_core::{deterministic_approval, missing_categories, required_count, ProjectSignals};
use specpilot_models::{Category, CollectedInfo, RequirementState};
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentRole};
use crate::gateway::{Generation, LlmGateway};
use crate::prompts::{judge_user_prompt, JUDGE_SYSTEM_PROMPT};
use crate::response::StepOutcome;

/// Feedback when the iteration ceiling forces completion.
pub const CEILING_FEEDBACK: &str =
    "최대 반복 횟수에 도달했습니다. 현재 수집된 정보로 SRS를 생성합니다.";

/// Feedback when the session is approved.
pub const APPROVED_FEEDBACK: &str =
    "충분한 정보가 수집되었습니다. SRS 문서를 생성할 수 있습니다.";

/// Feedback when the provider rejects without explanation.
pub const PENDING_FEEDBACK: &str = "추가 정보가 필요합니다.";

/// Score at or above which a verdict counts as approval.
pub const APPROVAL_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// A provider verdict parsed from free text.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub decision: Option<Decision>,
    pub score: Option<f64>,
    pub feedback: String,
}

impl Verdict {
    /// Approve decision or a score at the threshold.
    pub fn approves(&self) -> bool {
        self.decision == Some(Decision::Approve)
            || self.score.is_some_and(|s| s >= APPROVAL_THRESHOLD)
    }
}

fn score_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"completeness_score["']?\s*[:=]?\s*([0-9]*\.?[0-9]+)"#)
            .expect("Invalid regex pattern")
    })
}

/// Parses a provider reply into a verdict.
///
/// Keywords decide first ("approve"/"충분"/"완료" before
/// "reject"/"부족"/"필요") with default scores of 0.8 and 0.4; an explicit
/// `completeness_score` overrides the score. Returns `None` when the reply
/// has neither a keyword nor a score.
pub fn parse_verdict(reply: &str) -> Option<Verdict> {
    let lower = reply.to_lowercase();

    let (decision, mut score) =
        if lower.contains("approve") || reply.contains("충분") || reply.contains("완료") {
            (Some(Decision::Approve), Some(0.8))
        } else if lower.contains("reject") || reply.contains("부족") || reply.contains("필요") {
            (Some(Decision::Reject), Some(0.4))
        } else {
            (None, None)
        };

    if let Some(parsed) = score_pattern()
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        score = Some(parsed.clamp(0.0, 1.0));
    }

    if decision.is_none() && score.is_none() {
        return None;
    }

    let feedback = reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.starts_with('*'))
        .filter(|line| {
            let lower = line.to_lowercase();
            !["decision", "completeness", "missing"]
                .iter()
                .any(|key| lower.contains(key))
        })
        .take(3)
        .collect::<Vec<_>>()
        .join(" ");

    Some(Verdict {
        decision,
        score,
        feedback,
    })
}

fn labels(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Feedback for a rejection by the rule-based check.
pub fn rule_feedback(info: &CollectedInfo, signals: &ProjectSignals) -> String {
    let missing = missing_categories(info, signals);
    let count = info.category_count();
    let required = required_count(signals);
    if missing.is_empty() {
        format!(
            "추가 정보가 필요합니다. (현재 {}/{}개 정보 수집됨)",
            count, required
        )
    } else {
        format!(
            "추가 정보 필요: {} (현재 {}/{}개 수집)",
            labels(&missing),
            count,
            required
        )
    }
}

/// Decides completion for each pass.
#[derive(Clone)]
pub struct Judge {
    gateway: LlmGateway,
    max_iterations: u32,
}

impl Judge {
    pub fn new(gateway: LlmGateway, max_iterations: u32) -> Self {
        Self {
            gateway,
            max_iterations,
        }
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    fn apply_rule(&self, state: &mut RequirementState, signals: &ProjectSignals) {
        if deterministic_approval(&state.collected_info, signals) {
            state.mark_complete(APPROVED_FEEDBACK);
        } else {
            let feedback = rule_feedback(&state.collected_info, signals);
            state.mark_pending(feedback);
        }
    }

    fn apply_verdict(
        &self,
        state: &mut RequirementState,
        signals: &ProjectSignals,
        verdict: Verdict,
    ) {
        let missing = missing_categories(&state.collected_info, signals);
        if verdict.approves() && missing.is_empty() {
            let feedback = if verdict.feedback.is_empty() {
                APPROVED_FEEDBACK.to_string()
            } else {
                verdict.feedback
            };
            state.mark_complete(feedback);
        } else if verdict.approves() {
            debug!(missing = %labels(&missing), "Approval vetoed by mandatory categories");
            let feedback = rule_feedback(&state.collected_info, signals);
            state.mark_pending(feedback);
        } else if verdict.feedback.is_empty() {
            state.mark_pending(PENDING_FEEDBACK);
        } else {
            state.mark_pending(verdict.feedback);
        }
    }
}

#[async_trait]
impl Agent for Judge {
    fn role(&self) -> AgentRole {
        AgentRole::Judge
    }

    async fn run(&self, state: &mut RequirementState, signals: &ProjectSignals) -> StepOutcome {
        if state.is_complete {
            return StepOutcome::Skipped;
        }

        if state.iteration_count >= self.max_iterations {
            info!(
                iteration = state.iteration_count,
                max_iterations = self.max_iterations,
                "Iteration ceiling reached, forcing completion"
            );
            state.mark_complete(CEILING_FEEDBACK);
            return StepOutcome::Completed;
        }

        let prompt = judge_user_prompt(&state.collected_info, &state.conversation_history());
        let generation = self
            .gateway
            .generate_with_context(JUDGE_SYSTEM_PROMPT, &prompt)
            .await;

        match generation {
            Generation::Generated(reply) => match parse_verdict(&reply) {
                Some(verdict) => {
                    debug!(?verdict, "Judge verdict parsed");
                    self.apply_verdict(state, signals, verdict);
                    StepOutcome::Completed
                }
                None => {
                    warn!("Judge reply carried no verdict, using rule-based check");
                    self.apply_rule(state, signals);
                    StepOutcome::fallback("reply carried no verdict")
                }
            },
            Generation::Fallback { reason, .. } => {
                warn!(%reason, "Judge falling back to rule-based check");
                self.apply_rule(state, signals);
                StepOutcome::fallback(reason.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::gateway::{RetryPolicy, TextGenerator};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        async fn generate_with_context(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn judge(reply: &'static str) -> Judge {
        Judge::new(
            LlmGateway::new(Arc::new(Fixed(reply)), RetryPolicy::new(1, Duration::ZERO)),
            10,
        )
    }

    fn full_info() -> CollectedInfo {
        let mut info = CollectedInfo::new();
        info.set(Category::Authentication, "카카오 로그인");
        info.set(Category::Deployment, "AWS");
        info.set(Category::Scale, "1만 명");
        info.set(Category::ProjectType, "웹/앱 서비스");
        info
    }

    #[test]
    fn test_parse_verdict_keywords() {
        let verdict = parse_verdict("decision: approve\n충분히 명확합니다.").unwrap();
        assert_eq!(verdict.decision, Some(Decision::Approve));
        assert_eq!(verdict.score, Some(0.8));
        assert_eq!(verdict.feedback, "충분히 명확합니다.");

        let verdict = parse_verdict("인증 정보가 부족합니다.").unwrap();
        assert_eq!(verdict.decision, Some(Decision::Reject));
        assert!(!verdict.approves());
    }

    #[test]
    fn test_parse_verdict_score_overrides_default() {
        let verdict = parse_verdict("decision: reject\ncompleteness_score: 0.75").unwrap();
        assert_eq!(verdict.decision, Some(Decision::Reject));
        assert_eq!(verdict.score, Some(0.75));
        assert!(verdict.approves());

        let verdict = parse_verdict("{\"completeness_score\": 0.3}").unwrap();
        assert_eq!(verdict.decision, None);
        assert_eq!(verdict.score, Some(0.3));
    }

    #[test]
    fn test_parse_verdict_malformed() {
        assert!(parse_verdict("This is a deterministic stub response.").is_none());
    }

    #[test]
    fn test_rule_feedback_names_missing_categories() {
        let mut info = CollectedInfo::new();
        info.set(Category::Scale, "1만 명");
        let feedback = rule_feedback(&info, &ProjectSignals::default());
        assert_eq!(feedback, "추가 정보 필요: 인증 방식, 배포 환경 (현재 1/4개 수집)");
    }

    #[tokio::test]
    async fn test_ceiling_forces_completion() {
        let mut state = RequirementState::new();
        state.iteration_count = 10;

        let outcome = judge("reject").run(&mut state, &ProjectSignals::default()).await;
        assert_eq!(outcome, StepOutcome::Completed);
        assert!(state.is_complete);
        assert_eq!(state.judge_feedback.as_deref(), Some(CEILING_FEEDBACK));
    }

    #[tokio::test]
    async fn test_complete_state_is_latched() {
        let mut state = RequirementState::new();
        state.mark_complete("done");

        let outcome = judge("decision: reject").run(&mut state, &ProjectSignals::default()).await;
        assert!(outcome.is_skipped());
        assert!(state.is_complete);
        assert_eq!(state.judge_feedback.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_approval_vetoed_when_mandatory_missing() {
        let mut state = RequirementState::new();
        state.collected_info.set(Category::Authentication, "JWT");

        judge("decision: approve\ncompleteness_score: 0.9")
            .run(&mut state, &ProjectSignals::default())
            .await;
        assert!(!state.is_complete);
        assert_eq!(
            state.judge_feedback.as_deref(),
            Some("추가 정보 필요: 배포 환경, 예상 규모 (현재 1/4개 수집)")
        );
    }

    #[tokio::test]
    async fn test_approval_with_all_mandatory() {
        let mut state = RequirementState::new();
        state.collected_info = full_info();

        let outcome = judge("decision: approve")
            .run(&mut state, &ProjectSignals::default())
            .await;
        assert_eq!(outcome, StepOutcome::Completed);
        assert!(state.is_complete);
        assert_eq!(state.judge_feedback.as_deref(), Some(APPROVED_FEEDBACK));
    }

    #[tokio::test]
    async fn test_stub_uses_rule_based_check() {
        let mut state = RequirementState::new();
        state.collected_info = full_info();

        let outcome = Judge::new(LlmGateway::stub(), 10)
            .run(&mut state, &ProjectSignals::default())
            .await;
        assert!(outcome.is_fallback());
        assert!(state.is_complete);
    }

    #[tokio::test]
    async fn test_payment_required_for_commerce() {
        let mut state = RequirementState::new();
        state.collected_info = full_info();
        let signals = ProjectSignals {
            ecommerce: true,
            ..Default::default()
        };

        Judge::new(LlmGateway::stub(), 10).run(&mut state, &signals).await;
        assert!(!state.is_complete);
        assert_eq!(
            state.judge_feedback.as_deref(),
            Some("추가 정보 필요: 결제 수단 (현재 4/5개 수집)")
        );
    }

    #[tokio::test]
    async fn test_malformed_reply_uses_rule_based_check() {
        let mut state = RequirementState::new();
        let outcome = judge("hello there")
            .run(&mut state, &ProjectSignals::default())
            .await;
        assert!(outcome.is_fallback());
        assert!(!state.is_complete);
    }
}

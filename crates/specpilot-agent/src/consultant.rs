//! Consultant agent: asks the next clarifying question.

use regex::Regex;
use std::sync::OnceLock;

use async_trait::async_trait;
use specpilot_core::ProjectSignals;
use specpilot_models::{Category, CollectedInfo, Message, RequirementState};
use tracing::{debug, warn};

use crate::agent::{Agent, AgentRole};
use crate::gateway::{Generation, LlmGateway};
use crate::prompts::{consultant_user_prompt, CONSULTANT_SYSTEM_PROMPT};
use crate::response::StepOutcome;

/// Asked when the provider reply contains no usable question.
pub const DEFAULT_QUESTION: &str = "프로젝트에 대해 더 자세히 설명해주실 수 있나요?";

/// What the next question is about, in asking priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Payment,
    Authentication,
    Scale,
    Deployment,
    Details,
}

impl Topic {
    /// Highest-priority topic that is still missing.
    ///
    /// Payment is only asked about when the project needs it.
    pub fn next(info: &CollectedInfo, signals: &ProjectSignals) -> Self {
        if signals.requires_payment() && !info.contains(Category::Payment) {
            Self::Payment
        } else if !info.contains(Category::Authentication) {
            Self::Authentication
        } else if !info.contains(Category::Scale) {
            Self::Scale
        } else if !info.contains(Category::Deployment) {
            Self::Deployment
        } else {
            Self::Details
        }
    }

    /// Topic description handed to the provider.
    pub fn focus(&self) -> &'static str {
        match self {
            Self::Payment => "결제 수단 (PG사)",
            Self::Authentication => "회원 인증 방식",
            Self::Scale => "예상 사용자 규모",
            Self::Deployment => "배포 환경",
            Self::Details => "기타 기술적 세부사항",
        }
    }

    /// Canned question used when the provider is unavailable.
    pub fn fallback_question(&self) -> &'static str {
        match self {
            Self::Payment => "어떤 결제 PG사를 사용하시나요?",
            Self::Authentication => "회원 인증 방식은 어떻게 하시나요?",
            Self::Scale => "예상 사용자 수는 얼마나 되나요?",
            Self::Deployment => "배포 환경은 어디인가요?",
            Self::Details => "프로젝트의 주요 기능은 무엇인가요?",
        }
    }

    /// One-line answer hint appended to the assistant message.
    pub fn example_hint(&self) -> &'static str {
        match self {
            Self::Payment => "예: 토스페이먼츠, 카카오페이, 신용카드",
            Self::Authentication => "예: 카카오 로그인, 이메일/비밀번호, JWT",
            Self::Scale => "예: 동시 접속자 1만 명",
            Self::Deployment => "예: AWS, GCP, 온프레미스",
            Self::Details => "예: 관리자 페이지, 실시간 알림, 검색 기능",
        }
    }
}

fn parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*[(（][^)）]*[)）]").expect("Invalid regex pattern"))
}

fn clean_line(line: &str) -> String {
    let line = line
        .trim()
        .trim_start_matches(|c: char| {
            c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | '*' | '•' | '#' | ' ')
        })
        .replace("**", "");
    let line = parenthetical().replace_all(&line, "");
    line.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”'))
        .trim()
        .to_string()
}

/// Picks the first line of a reply that contains a question mark.
///
/// List markers, bold markers and parenthetical asides are stripped, and
/// anything after the first question mark is dropped.
pub fn extract_question(reply: &str) -> Option<String> {
    reply.lines().find_map(|line| {
        let cleaned = clean_line(line);
        let end = cleaned.find(|c: char| c == '?' || c == '？')?;
        let mark_len = cleaned[end..].chars().next().map_or(1, char::len_utf8);
        let question = cleaned[..end + mark_len].trim();
        (question.chars().count() > 1).then(|| question.to_string())
    })
}

/// Produces exactly one pending question per pass.
#[derive(Clone)]
pub struct Consultant {
    gateway: LlmGateway,
}

impl Consultant {
    pub fn new(gateway: LlmGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Agent for Consultant {
    fn role(&self) -> AgentRole {
        AgentRole::Consultant
    }

    async fn run(&self, state: &mut RequirementState, signals: &ProjectSignals) -> StepOutcome {
        let topic = Topic::next(&state.collected_info, signals);
        let prompt = consultant_user_prompt(&state.collected_info, &state.user_input, topic.focus());

        let generation = self
            .gateway
            .generate_with_context(CONSULTANT_SYSTEM_PROMPT, &prompt)
            .await;

        let (question, outcome) = match &generation {
            Generation::Generated(reply) => match extract_question(reply) {
                Some(question) => (question, StepOutcome::Completed),
                None => {
                    warn!(?topic, "Consultant reply contained no question, using default");
                    (
                        DEFAULT_QUESTION.to_string(),
                        StepOutcome::fallback("reply contained no question"),
                    )
                }
            },
            Generation::Fallback { reason, .. } => {
                warn!(?topic, %reason, "Consultant falling back to canned question");
                (
                    topic.fallback_question().to_string(),
                    StepOutcome::fallback(reason.to_string()),
                )
            }
        };

        debug!(?topic, question = %question, "Consultant asked");
        state.set_question(question.clone());
        state.push_message(Message::assistant(format!(
            "{}\n{}",
            question,
            topic.example_hint()
        )));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::gateway::{RetryPolicy, TextGenerator};
    use specpilot_models::MessageRole;
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

    fn consultant(reply: &'static str) -> Consultant {
        Consultant::new(LlmGateway::new(
            Arc::new(Fixed(reply)),
            RetryPolicy::new(1, Duration::ZERO),
        ))
    }

    fn ecommerce() -> ProjectSignals {
        ProjectSignals {
            ecommerce: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_topic_priority() {
        let mut info = CollectedInfo::new();
        assert_eq!(Topic::next(&info, &ecommerce()), Topic::Payment);
        assert_eq!(Topic::next(&info, &ProjectSignals::default()), Topic::Authentication);

        info.set(Category::Payment, "토스페이먼츠");
        info.set(Category::Authentication, "JWT");
        assert_eq!(Topic::next(&info, &ecommerce()), Topic::Scale);

        info.set(Category::Scale, "1만 명");
        assert_eq!(Topic::next(&info, &ecommerce()), Topic::Deployment);

        info.set(Category::Deployment, "AWS");
        assert_eq!(Topic::next(&info, &ecommerce()), Topic::Details);
    }

    #[test]
    fn test_extract_question_cleans_reply() {
        assert_eq!(
            extract_question("1. **어떤 결제 수단을 지원하나요?** (예: 카드, 계좌이체)").as_deref(),
            Some("어떤 결제 수단을 지원하나요?")
        );
        assert_eq!(
            extract_question("좋습니다.\n- 회원 인증 방식은? 소셜 로그인도 가능합니다").as_deref(),
            Some("회원 인증 방식은?")
        );
        assert_eq!(
            extract_question("\"예상 사용자 수는 얼마나 되나요？\"").as_deref(),
            Some("예상 사용자 수는 얼마나 되나요？")
        );
        assert_eq!(extract_question("감사합니다. 정보를 정리하겠습니다."), None);
        assert_eq!(extract_question("?"), None);
    }

    #[tokio::test]
    async fn test_uses_provider_question() {
        let mut state = RequirementState::new();
        state.user_input = "쇼핑몰".into();

        let outcome = consultant("- 어떤 PG사를 사용하시나요?")
            .run(&mut state, &ecommerce())
            .await;

        assert_eq!(outcome, StepOutcome::Completed);
        assert_eq!(state.questions, vec!["어떤 PG사를 사용하시나요?".to_string()]);
        let last = state.messages.last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert!(last.content.starts_with("어떤 PG사를 사용하시나요?"));
        assert!(last.content.contains("예: 토스페이먼츠"));
    }

    #[tokio::test]
    async fn test_reply_without_question_uses_default() {
        let mut state = RequirementState::new();
        let outcome = consultant("네, 알겠습니다.")
            .run(&mut state, &ProjectSignals::default())
            .await;

        assert!(outcome.is_fallback());
        assert_eq!(state.questions, vec![DEFAULT_QUESTION.to_string()]);
    }

    #[tokio::test]
    async fn test_stub_uses_topic_question() {
        let mut state = RequirementState::new();
        let outcome = Consultant::new(LlmGateway::stub())
            .run(&mut state, &ecommerce())
            .await;

        assert!(outcome.is_fallback());
        assert_eq!(state.questions.len(), 1);
        assert_eq!(state.questions[0], Topic::Payment.fallback_question());
        assert_eq!(state.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_question_replaces_previous() {
        let mut state = RequirementState::new();
        let agent = Consultant::new(LlmGateway::stub());
        agent.run(&mut state, &ProjectSignals::default()).await;
        state.collected_info.set(Category::Authentication, "JWT");
        agent.run(&mut state, &ProjectSignals::default()).await;

        assert_eq!(state.questions, vec![Topic::Scale.fallback_question().to_string()]);
        assert_eq!(state.messages.len(), 2);
    }
}

//! Prompt templates for the Consultant and Judge.

use specpilot_models::{Category, CollectedInfo};

/// System prompt constraining the Consultant to one short question.
pub const CONSULTANT_SYSTEM_PROMPT: &str = "\
You are an experienced Business Analyst.
Ask ONE short question to collect NEW information for SRS writing.

CRITICAL RULES:
1. Generate ONLY ONE question
2. Maximum 15 words
3. NO examples, NO explanations, NO parentheses
4. Just ask the core question
5. NEVER ask about information that is already collected
6. Answer in Korean

GOOD examples:
- \"예상 동시 접속자 수는?\"
- \"어떤 결제 수단을 지원하나요?\"
- \"회원 인증 방식은?\"";

/// System prompt asking the Judge for a decision and a score.
pub const JUDGE_SYSTEM_PROMPT: &str = "\
당신은 엄격한 품질 관리자(QA)이자 PM입니다.
수집된 요구사항 정보가 개발 가능한 수준의 SRS를 작성하기에 충분한지 판단하세요.

평가 기준:
1. 기능적 명확성: 핵심 기능이 구체적으로 정의되었는가?
2. 기술적 실현 가능성: 아키텍처와 기술 스택 선택에 필요한 정보가 있는가?
3. 비기능 요구사항: 성능, 보안, 확장성 제약이 명시되었는가?
4. 테스트 가능성: 기능의 성공과 실패를 판단할 수 있는가?

3개 이상 만족하면 approve, 그 외에는 reject 입니다.

출력 형식:
decision: approve 또는 reject
completeness_score: 0.0 ~ 1.0
feedback: 한 문장 요약";

/// Renders the collected categories as a bullet list.
pub fn describe_collected(info: &CollectedInfo) -> String {
    let lines: Vec<String> = Category::ALL
        .iter()
        .filter_map(|c| info.get(*c).map(|v| format!("- {}: {}", c.label(), v)))
        .collect();
    if lines.is_empty() {
        "(없음)".to_string()
    } else {
        lines.join("\n")
    }
}

/// User prompt for the Consultant, naming the topic to ask about.
pub fn consultant_user_prompt(info: &CollectedInfo, user_input: &str, focus: &str) -> String {
    format!(
        "이미 수집된 정보:\n{}\n\n최신 사용자 응답:\n{}\n\n\
         다음 주제에 대해 아직 수집되지 않은 정보를 묻는 짧은 질문 하나만 출력하세요: {}\n\
         이미 수집된 항목은 묻지 마세요. 질문만 출력하세요.",
        describe_collected(info),
        user_input,
        focus
    )
}

/// User prompt for the Judge.
pub fn judge_user_prompt(info: &CollectedInfo, conversation_history: &str) -> String {
    format!(
        "수집된 요구사항 정보:\n{}\n\n대화 히스토리:\n{}\n\n\
         위 정보를 바탕으로 SRS 작성 가능 여부를 평가하세요.",
        describe_collected(info),
        conversation_history
    )
}

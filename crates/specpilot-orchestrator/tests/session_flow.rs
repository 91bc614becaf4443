//! End-to-end session flows through the service using the stub provider.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use specpilot_agent::{LlmGateway, RetryPolicy, TextGenerator};
use specpilot_models::SessionId;
use specpilot_orchestrator::{ServiceError, SessionService, SrsFormat, SrsPayload, Workflow};
use specpilot_persistence::FileSessionStore;

const SHOP_REQUEST: &str = "온라인 쇼핑몰을 만들고 싶습니다. 결제와 회원가입 기능이 필요합니다.";

const SHOP_ANSWERS: [&str; 5] = [
    "카카오 로그인으로 회원 인증을 하려고 해요",
    "AWS에 배포할 예정입니다",
    "동시 접속자는 1만 명 정도 예상합니다",
    "결제는 토스페이먼츠를 사용할게요",
    "관리자 페이지도 필요합니다",
];

fn service() -> SessionService {
    SessionService::in_memory(Workflow::stub(10))
}

#[tokio::test]
async fn test_start_session_asks_one_question() {
    let service = service();

    let snapshot = service.start_session(SHOP_REQUEST).await.unwrap();

    assert!(!snapshot.session_id.as_str().is_empty());
    assert_eq!(snapshot.questions.len(), 1);
    assert!(!snapshot.questions[0].is_empty());
    assert!(!snapshot.is_complete);
    assert_eq!(snapshot.iteration_count, 1);
    assert!(snapshot.final_srs.is_none());
}

#[tokio::test]
async fn test_ecommerce_conversation_completes_with_srs() {
    let service = service();
    let id = service.start_session(SHOP_REQUEST).await.unwrap().session_id;

    let mut last = None;
    for answer in SHOP_ANSWERS {
        last = Some(service.continue_session(&id, answer).await.unwrap());
    }
    let last = last.unwrap();

    assert!(last.is_complete);
    assert_eq!(last.iteration_count, 6);
    let srs = last.final_srs.expect("complete session carries an SRS");
    assert!(srs.requirement("FR-001").is_some());

    let info = service.collected_info(&id).await.unwrap().collected_info;
    assert_eq!(info.payment.as_deref(), Some("토스페이먼츠"));
    assert_eq!(info.authentication.as_deref(), Some("카카오 로그인"));
    assert_eq!(info.deployment.as_deref(), Some("AWS"));
    assert_eq!(info.scale.as_deref(), Some("1만 명"));
    assert_eq!(info.project_type.as_deref(), Some("이커머스"));

    let export = service.get_srs(&id, SrsFormat::Markdown).await.unwrap();
    let markdown = export.final_srs.as_ref().and_then(SrsPayload::as_markdown).unwrap();
    assert!(markdown.contains("## 기능 요구사항"));
    assert!(markdown.contains("### FR-001"));
}

#[tokio::test]
async fn test_unknown_session_is_not_created() {
    let service = service();
    let ghost = SessionId::from("nonexistent-id");

    let result = service.continue_session(&ghost, "anything").await;

    assert!(matches!(result, Err(ServiceError::NotFound(ref id)) if *id == ghost));
    assert!(matches!(service.status(&ghost).await, Err(ServiceError::NotFound(_))));
    assert!(service.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_makes_session_unknown() {
    let service = service();
    let id = service.start_session(SHOP_REQUEST).await.unwrap().session_id;
    assert!(service.status(&id).await.is_ok());

    service.reset_session(&id).await.unwrap();

    assert!(matches!(service.status(&id).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(service.reset_session(&id).await, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_short_initial_input_is_rejected() {
    let service = service();

    let result = service.start_session("쇼핑몰 만들어줘요").await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));
    assert!(service.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sessions_do_not_interfere() {
    let service = service();
    let a = service.start_session(SHOP_REQUEST).await.unwrap().session_id;
    let b = service
        .start_session("사내 인트라넷 전자결재 시스템을 만들려고 합니다")
        .await
        .unwrap()
        .session_id;
    let before = service.collected_info(&b).await.unwrap();

    service.continue_session(&a, "AWS에 배포할 예정입니다").await.unwrap();

    assert_eq!(service.collected_info(&b).await.unwrap(), before);
    assert_eq!(service.status(&b).await.unwrap().iteration_count, 1);
    assert_eq!(service.status(&a).await.unwrap().iteration_count, 2);
}

#[tokio::test]
async fn test_same_session_passes_are_serialized() {
    let service = Arc::new(service());
    let id = service.start_session(SHOP_REQUEST).await.unwrap().session_id;

    let answers = ["JWT", "AWS", "1000명", "신용카드", "검색 기능", "리뷰 기능"];
    let results = join_all(answers.iter().map(|answer| {
        let service = Arc::clone(&service);
        let id = id.clone();
        async move { service.continue_session(&id, answer).await }
    }))
    .await;

    let mut counts: Vec<u32> = results
        .into_iter()
        .map(|r| r.unwrap().iteration_count)
        .collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![2, 3, 4, 5, 6, 7]);
    assert_eq!(service.status(&id).await.unwrap().iteration_count, 7);
}

#[tokio::test]
async fn test_file_backed_sessions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let service = SessionService::new(
            Arc::new(FileSessionStore::new(dir.path())),
            Workflow::stub(10),
        );
        service.start_session(SHOP_REQUEST).await.unwrap().session_id
    };

    let service = SessionService::new(
        Arc::new(FileSessionStore::new(dir.path())),
        Workflow::stub(10),
    );
    let snapshot = service
        .continue_session(&id, "카카오 로그인으로 회원 인증을 하려고 해요")
        .await
        .unwrap();

    assert_eq!(snapshot.iteration_count, 2);
    assert_eq!(service.list_sessions().await.unwrap(), vec![id]);
}

struct FlakyProvider {
    calls: AtomicU32,
}

#[async_trait]
impl TextGenerator for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn generate(&self, _prompt: &str) -> specpilot_agent::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(specpilot_agent::AgentError::Network("connection reset".into()))
    }

    async fn generate_with_context(
        &self,
        _system: &str,
        _user: &str,
    ) -> specpilot_agent::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(specpilot_agent::AgentError::Network("connection reset".into()))
    }
}

#[tokio::test]
async fn test_provider_outage_still_completes_pass() {
    let provider = Arc::new(FlakyProvider {
        calls: AtomicU32::new(0),
    });
    let gateway = LlmGateway::new(provider.clone(), RetryPolicy::new(3, Duration::ZERO));
    let service = SessionService::in_memory(Workflow::new(gateway, 10));

    let snapshot = service.start_session(SHOP_REQUEST).await.unwrap();

    assert_eq!(snapshot.questions.len(), 1);
    assert_eq!(snapshot.iteration_count, 1);
    assert!(snapshot.judge_feedback.is_some());
    // Consultant and Judge each exhaust three attempts.
    assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
}

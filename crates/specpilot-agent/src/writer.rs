//! Writer agent: renders the SRS document.
//!
//! [`SrsWriter::compose`] is a pure function of the session state and the
//! pass's [`ProjectSignals`]; the same input always produces the same
//! document.

use async_trait::async_trait;
use specpilot_core::ProjectSignals;
use specpilot_models::{
    Category, CollectedInfo, FunctionalRequirement, GherkinScenario, Priority, RequirementState,
    SrsDocument, TechStackRecommendation,
};
use tracing::info;

use crate::agent::{Agent, AgentRole};
use crate::response::StepOutcome;

const DEFAULT_PROJECT_NAME: &str = "신규 소프트웨어 프로젝트";

const SOCIAL_LOGIN_MARKERS: &[&str] = &["카카오", "네이버", "구글", "애플", "소셜", "OAuth"];
const PAAS_TARGETS: &[&str] = &["Vercel", "Heroku", "Netlify"];

struct Draft {
    title: &'static str,
    description: String,
    priority: Priority,
    tech: Vec<String>,
}

fn draft(title: &'static str, description: impl Into<String>, priority: Priority, tech: &[&str]) -> Draft {
    Draft {
        title,
        description: description.into(),
        priority,
        tech: tech.iter().map(|t| t.to_string()).collect(),
    }
}

fn stack(category: &str, technologies: &[&str], rationale: impl Into<String>) -> TechStackRecommendation {
    TechStackRecommendation {
        category: category.to_string(),
        technologies: technologies.iter().map(|t| t.to_string()).collect(),
        rationale: rationale.into(),
    }
}

fn scenario(feature: &str, name: &str, given: &str, when: impl Into<String>, then: &str) -> GherkinScenario {
    GherkinScenario {
        feature: feature.to_string(),
        scenario: name.to_string(),
        given: given.to_string(),
        when: when.into(),
        then: then.to_string(),
    }
}

fn is_social_login(auth: &str) -> bool {
    SOCIAL_LOGIN_MARKERS.iter().any(|m| auth.contains(m))
}

fn crud_requirements() -> Vec<Draft> {
    vec![
        draft(
            "데이터 등록",
            "사용자는 새로운 데이터를 입력하고 저장할 수 있다.",
            Priority::High,
            &["REST API", "PostgreSQL"],
        ),
        draft(
            "데이터 조회 및 검색",
            "사용자는 저장된 데이터를 목록으로 조회하고 조건별로 검색할 수 있다.",
            Priority::High,
            &["REST API", "페이지네이션"],
        ),
        draft(
            "데이터 수정 및 삭제",
            "사용자는 본인이 등록한 데이터를 수정하거나 삭제할 수 있다.",
            Priority::Medium,
            &["REST API", "권한 검사"],
        ),
    ]
}

/// Composes SRS documents from session state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrsWriter;

impl SrsWriter {
    /// Builds the complete document.
    pub fn compose(state: &RequirementState, signals: &ProjectSignals) -> SrsDocument {
        let info = &state.collected_info;
        SrsDocument {
            project_name: Self::project_name(info),
            overview: Self::overview(state),
            functional_requirements: Self::functional_requirements(info, signals),
            non_functional_requirements: Self::non_functional_requirements(info, signals),
            tech_stack: Self::tech_stack(info, signals),
            test_scenarios: Self::test_scenarios(info, signals),
            assumptions: Self::assumptions(info),
        }
    }

    fn project_name(info: &CollectedInfo) -> String {
        match info.get(Category::ProjectType) {
            Some(project_type) => format!("{} 프로젝트", project_type),
            None => DEFAULT_PROJECT_NAME.to_string(),
        }
    }

    /// The original request followed by a bullet per collected category.
    fn overview(state: &RequirementState) -> String {
        let info = &state.collected_info;
        let bullets: Vec<String> = Category::ALL
            .iter()
            .filter_map(|c| info.get(*c).map(|v| format!("- {}: {}", c.label(), v)))
            .collect();

        let request = state.initial_request().trim();
        if bullets.is_empty() {
            request.to_string()
        } else {
            format!("{}\n\n**수집된 요구사항:**\n{}", request, bullets.join("\n"))
        }
    }

    fn functional_requirements(
        info: &CollectedInfo,
        signals: &ProjectSignals,
    ) -> Vec<FunctionalRequirement> {
        let payment = info.get(Category::Payment);
        let mut drafts = Vec::new();

        if let Some(auth) = info.get(Category::Authentication) {
            let tech: &[&str] = if is_social_login(auth) {
                &["OAuth 2.0", "JWT"]
            } else if auth.contains("SSO") || auth.contains("LDAP") {
                &["SAML 2.0", "LDAP"]
            } else if auth.contains("휴대폰") {
                &["본인인증 API", "JWT"]
            } else {
                &["JWT", "bcrypt"]
            };
            drafts.push(draft(
                "사용자 인증",
                format!("{} 방식으로 회원가입, 로그인, 로그아웃을 지원한다.", auth),
                Priority::High,
                tech,
            ));
        }

        let mut payment_covered = false;
        if signals.ecommerce {
            drafts.push(draft(
                "상품 목록 및 검색",
                "사용자는 카테고리별 상품 목록을 조회하고 키워드로 상품을 검색할 수 있다.",
                Priority::High,
                &["Elasticsearch", "REST API"],
            ));
            drafts.push(draft(
                "장바구니",
                "사용자는 상품을 장바구니에 담고 수량을 변경하거나 삭제할 수 있다.",
                Priority::High,
                &["Redis", "REST API"],
            ));
            let mut order = draft(
                "주문 및 결제",
                format!(
                    "사용자는 장바구니의 상품을 주문하고 {}(으)로 결제할 수 있다.",
                    payment.unwrap_or("지정된 결제 수단")
                ),
                Priority::High,
                &["PG 연동 API", "Webhook"],
            );
            if let Some(provider) = payment {
                order.tech.insert(0, provider.to_string());
            }
            drafts.push(order);
            payment_covered = true;
        } else if signals.social {
            drafts.push(draft(
                "게시물 작성",
                "사용자는 텍스트와 이미지를 포함한 게시물을 작성, 수정, 삭제할 수 있다.",
                Priority::High,
                &["S3", "REST API"],
            ));
            drafts.push(draft(
                "댓글 및 좋아요",
                "사용자는 게시물에 댓글을 달고 좋아요를 누를 수 있다.",
                Priority::Medium,
                &["PostgreSQL", "Redis"],
            ));
            drafts.push(draft(
                "팔로우 및 피드",
                "사용자는 다른 사용자를 팔로우하고 팔로우한 사용자의 게시물을 피드로 확인할 수 있다.",
                Priority::Medium,
                &["Redis", "Fan-out on write"],
            ));
        } else if signals.booking && !signals.intranet {
            drafts.push(draft(
                "예약 가능 일정 조회",
                "사용자는 날짜와 시간대별 예약 가능 여부를 조회할 수 있다.",
                Priority::High,
                &["PostgreSQL", "REST API"],
            ));
            drafts.push(draft(
                "예약 생성",
                "사용자는 원하는 일정을 선택해 예약하고 확인 알림을 받을 수 있다.",
                Priority::High,
                &["트랜잭션 잠금", "알림 API"],
            ));
            drafts.push(draft(
                "예약 취소 및 변경",
                "사용자는 예약을 취소하거나 일정을 변경할 수 있으며 취소 규정에 따라 환불된다.",
                Priority::Medium,
                &["PostgreSQL"],
            ));
        } else if signals.intranet {
            drafts.push(draft(
                "조직도",
                "임직원은 부서와 직급별 조직도를 조회할 수 있다.",
                Priority::Medium,
                &["LDAP", "REST API"],
            ));
            drafts.push(draft(
                "전자결재",
                "임직원은 결재 문서를 상신하고 결재선에 따라 승인 또는 반려할 수 있다.",
                Priority::High,
                &["워크플로 엔진", "PostgreSQL"],
            ));
            drafts.push(draft(
                "사내 게시판",
                "임직원은 공지사항과 부서 게시판에 글을 작성하고 조회할 수 있다.",
                Priority::Medium,
                &["PostgreSQL", "REST API"],
            ));
            drafts.push(draft(
                "회의실 예약",
                "임직원은 회의실 사용 현황을 조회하고 예약할 수 있다.",
                Priority::Medium,
                &["캘린더 API", "PostgreSQL"],
            ));
        } else if signals.delivery {
            drafts.push(draft(
                "음식점 검색",
                "사용자는 위치 기반으로 주변 음식점과 메뉴를 검색할 수 있다.",
                Priority::High,
                &["PostGIS", "Elasticsearch"],
            ));
            drafts.push(draft(
                "주문 및 배달 추적",
                "사용자는 메뉴를 주문하고 배달 상태를 실시간으로 확인할 수 있다.",
                Priority::High,
                &["WebSocket", "지도 API"],
            ));
        } else {
            drafts.extend(crud_requirements());
        }

        if signals.realtime {
            drafts.push(draft(
                "실시간 메시징",
                "사용자는 실시간으로 메시지를 주고받고 새 메시지 알림을 받을 수 있다.",
                Priority::High,
                &["WebSocket", "Redis Pub/Sub"],
            ));
        }

        if signals.admin {
            drafts.push(draft(
                "관리자 콘솔",
                "관리자는 사용자와 콘텐츠 등 운영 데이터를 조회하고 관리할 수 있다.",
                Priority::Medium,
                &["Admin Dashboard", "RBAC"],
            ));
        }

        if let (Some(provider), false) = (payment, payment_covered) {
            let mut payment_fr = draft(
                "결제 처리",
                format!(
                    "{}을(를) 통해 결제를 처리하고 결제 내역을 조회할 수 있다.",
                    provider
                ),
                Priority::High,
                &["PG 연동 API", "Webhook"],
            );
            payment_fr.tech.insert(0, provider.to_string());
            drafts.push(payment_fr);
        }

        if drafts.len() < 2 {
            drafts.extend(crud_requirements());
        }

        drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| FunctionalRequirement {
                id: format!("FR-{:03}", i + 1),
                title: d.title.to_string(),
                description: d.description,
                priority: d.priority,
                tech_suggestions: d.tech,
            })
            .collect()
    }

    fn non_functional_requirements(info: &CollectedInfo, signals: &ProjectSignals) -> Vec<String> {
        let mut nfrs = vec![
            "성능: API 평균 응답 시간 1초 이내, 95퍼센타일 2초 이내".to_string(),
            "가용성: 99.9% 이상 (월간 다운타임 43분 이내)".to_string(),
            "보안: 모든 통신은 HTTPS로 암호화하고 개인정보는 암호화하여 저장".to_string(),
        ];
        if let Some(scale) = info.get(Category::Scale) {
            nfrs.push(format!("확장성: 예상 규모 {}의 사용자를 안정적으로 처리", scale));
        }
        if info.contains(Category::Payment) {
            nfrs.push("결제 보안: PCI-DSS 준수, 카드 정보는 직접 저장하지 않고 PG사에 위임".to_string());
        }
        if signals.large_scale {
            nfrs.push("오토스케일링: 트래픽 급증 시 수평 확장으로 자동 대응".to_string());
        }
        nfrs
    }

    fn tech_stack(info: &CollectedInfo, signals: &ProjectSignals) -> Vec<TechStackRecommendation> {
        let mut recommendations = Vec::new();

        recommendations.push(if signals.large_scale || signals.ecommerce {
            stack(
                "Backend",
                &["Spring Boot", "Kafka", "PostgreSQL", "Redis"],
                "대규모 트래픽과 도메인 분리를 위해 마이크로서비스 아키텍처를 권장합니다.",
            )
        } else if signals.realtime {
            stack(
                "Backend",
                &["NestJS", "Socket.IO", "Redis Pub/Sub"],
                "실시간 양방향 통신을 위해 이벤트 기반 아키텍처를 권장합니다.",
            )
        } else {
            stack(
                "Backend",
                &["FastAPI", "PostgreSQL"],
                "초기 개발 속도를 위해 경량 모놀리식 구조를 권장합니다.",
            )
        });

        recommendations.push(if signals.mobile {
            stack(
                "Frontend",
                &["React Native", "TypeScript"],
                "하나의 코드베이스로 iOS와 Android를 함께 지원합니다.",
            )
        } else if signals.seo {
            stack(
                "Frontend",
                &["Next.js", "TypeScript", "Tailwind CSS"],
                "서버 사이드 렌더링으로 검색 노출을 최적화합니다.",
            )
        } else if signals.admin {
            stack(
                "Frontend",
                &["React", "TypeScript", "Ant Design"],
                "관리 화면에 필요한 테이블과 폼 컴포넌트를 바로 사용할 수 있습니다.",
            )
        } else {
            stack(
                "Frontend",
                &["React", "TypeScript", "Vite"],
                "널리 쓰이는 생태계로 빠르게 화면을 구성할 수 있습니다.",
            )
        });

        if signals.iot {
            recommendations.push(stack(
                "Database",
                &["TimescaleDB", "Redis"],
                "센서 데이터 같은 시계열 데이터를 효율적으로 저장하고 조회합니다.",
            ));
        } else if signals.large_scale || !signals.is_generic() {
            recommendations.push(stack(
                "Database",
                &["PostgreSQL", "Redis"],
                "트랜잭션 정합성은 관계형 DB로, 조회 부하는 캐시로 분산합니다.",
            ));
        }

        if let Some(target) = info.get(Category::Deployment) {
            recommendations.push(if target.contains("AWS") {
                stack(
                    "DevOps",
                    &["AWS ECS", "Amazon RDS", "CloudFront", "GitHub Actions"],
                    "AWS 관리형 서비스로 운영 부담을 줄이고 자동 배포를 구성합니다.",
                )
            } else if target.contains("GCP") {
                stack(
                    "DevOps",
                    &["Cloud Run", "Cloud SQL", "Cloud Build"],
                    "GCP 서버리스 컨테이너로 트래픽에 맞춰 자동 확장합니다.",
                )
            } else if target.contains("온프레미스") {
                stack(
                    "DevOps",
                    &["Docker", "Kubernetes", "Jenkins"],
                    "사내 인프라에서 컨테이너 오케스트레이션과 CI/CD를 직접 운영합니다.",
                )
            } else if PAAS_TARGETS.iter().any(|p| target.contains(p)) {
                stack(
                    "DevOps",
                    &[target, "GitHub Actions"],
                    "소규모 서비스에 적합한 PaaS로 인프라 관리 없이 배포합니다.",
                )
            } else {
                stack(
                    "DevOps",
                    &["Docker", "GitHub Actions", target],
                    format!("{} 환경에 컨테이너 기반으로 배포합니다.", target),
                )
            });
        }

        if signals.realtime {
            recommendations.push(stack(
                "Real-time",
                &["WebSocket", "Redis Pub/Sub"],
                "다중 서버 환경에서도 실시간 메시지를 전달합니다.",
            ));
        }

        if let Some(provider) = info.get(Category::Payment) {
            recommendations.push(stack(
                "Payment",
                &[provider, "Webhook"],
                format!("{} 연동으로 결제 승인과 취소를 처리합니다.", provider),
            ));
        }

        recommendations
    }

    fn test_scenarios(info: &CollectedInfo, signals: &ProjectSignals) -> Vec<GherkinScenario> {
        let mut scenarios = Vec::new();

        if let Some(auth) = info.get(Category::Authentication) {
            scenarios.push(scenario(
                "사용자 인증",
                "로그인 성공",
                "등록된 사용자가 로그인 페이지에 있다",
                format!("{}(으)로 로그인을 시도한다", auth),
                "인증 토큰이 발급되고 메인 페이지로 이동한다",
            ));
        }

        if let Some(provider) = info.get(Category::Payment) {
            scenarios.push(scenario(
                "결제 처리",
                "결제 성공",
                "사용자가 주문서를 작성했다",
                format!("{}(으)로 결제를 요청한다", provider),
                "결제가 승인되고 주문 상태가 결제 완료로 변경된다",
            ));
            scenarios.push(scenario(
                "결제 처리",
                "결제 실패",
                "사용자의 결제 수단 한도가 초과되었다",
                format!("{}(으)로 결제를 요청한다", provider),
                "실패 사유가 표시되고 주문은 생성되지 않는다",
            ));
        }

        if signals.ecommerce {
            scenarios.push(scenario(
                "장바구니",
                "상품 담기",
                "사용자가 상품 상세 페이지에 있다",
                "장바구니 담기 버튼을 누른다",
                "장바구니에 상품이 추가되고 수량이 표시된다",
            ));
        }
        if signals.social {
            scenarios.push(scenario(
                "게시물",
                "게시물 작성",
                "로그인한 사용자가 피드 화면에 있다",
                "텍스트와 이미지를 입력하고 게시한다",
                "팔로워의 피드에 새 게시물이 노출된다",
            ));
        }
        if signals.booking {
            scenarios.push(scenario(
                "예약",
                "예약 생성",
                "선택한 시간대가 예약 가능하다",
                "사용자가 예약을 확정한다",
                "예약이 생성되고 확인 알림이 발송된다",
            ));
        }
        if signals.realtime {
            scenarios.push(scenario(
                "실시간 메시징",
                "메시지 전송",
                "두 사용자가 같은 대화방에 접속해 있다",
                "한 사용자가 메시지를 보낸다",
                "상대방 화면에 1초 이내로 메시지가 표시된다",
            ));
        }
        if signals.delivery {
            scenarios.push(scenario(
                "배달 추적",
                "배달 상태 확인",
                "사용자의 주문이 배달 중이다",
                "주문 상세 화면을 연다",
                "라이더의 현재 위치와 예상 도착 시간이 표시된다",
            ));
        }
        if signals.admin {
            scenarios.push(scenario(
                "관리자 콘솔",
                "사용자 이용 정지",
                "관리자가 관리자 콘솔에 로그인했다",
                "특정 사용자를 이용 정지 처리한다",
                "해당 사용자는 더 이상 로그인할 수 없다",
            ));
        }
        if signals.content {
            scenarios.push(scenario(
                "콘텐츠",
                "콘텐츠 발행",
                "작성자가 콘텐츠 편집기에 있다",
                "글을 작성하고 발행한다",
                "목록과 상세 페이지에서 콘텐츠가 조회된다",
            ));
        }

        if scenarios.is_empty() {
            scenarios.push(scenario(
                "데이터 관리",
                "데이터 등록",
                "사용자가 등록 화면에 있다",
                "필수 항목을 입력하고 저장한다",
                "목록에 새 데이터가 표시된다",
            ));
            scenarios.push(scenario(
                "데이터 관리",
                "데이터 조회",
                "저장된 데이터가 있다",
                "사용자가 검색어를 입력한다",
                "조건에 맞는 데이터만 표시된다",
            ));
            scenarios.push(scenario(
                "데이터 관리",
                "데이터 삭제",
                "사용자가 본인이 등록한 데이터를 보고 있다",
                "삭제 버튼을 누르고 확인한다",
                "목록에서 해당 데이터가 사라진다",
            ));
        }

        scenarios
    }

    fn assumptions(info: &CollectedInfo) -> Vec<String> {
        let mut assumptions = Vec::new();

        if let Some(target) = info.get(Category::Deployment) {
            assumptions.push(format!("{} 환경에 배포합니다.", target));
        }
        if let Some(scale) = info.get(Category::Scale) {
            assumptions.push(format!("초기 예상 사용자 규모는 {}입니다.", scale));
        }
        assumptions.push("개발 기간은 3개월로 가정합니다.".to_string());

        let mut providers = Vec::new();
        if let Some(provider) = info.get(Category::Payment) {
            providers.push(provider);
        }
        if let Some(auth) = info.get(Category::Authentication).filter(|a| is_social_login(a)) {
            providers.push(auth);
        }
        if !providers.is_empty() {
            assumptions.push(format!(
                "외부 서비스({})의 API 정책과 가용성에 의존합니다.",
                providers.join(", ")
            ));
        }

        let missing: Vec<&str> = Category::ALL
            .iter()
            .filter(|c| !info.contains(**c))
            .map(|c| c.label())
            .collect();
        if !missing.is_empty() {
            assumptions.push(format!(
                "명시되지 않은 항목({})은 업계 표준 관행을 따릅니다.",
                missing.join(", ")
            ));
        }

        assumptions
    }
}

/// Agent wrapper storing the composed document in the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Writer;

impl Writer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for Writer {
    fn role(&self) -> AgentRole {
        AgentRole::Writer
    }

    async fn run(&self, state: &mut RequirementState, signals: &ProjectSignals) -> StepOutcome {
        if !state.is_complete {
            return StepOutcome::Skipped;
        }
        let document = SrsWriter::compose(state, signals);
        info!(
            project = %document.project_name,
            requirements = document.functional_requirements.len(),
            "SRS document written"
        );
        state.final_srs = Some(document);
        StepOutcome::Completed
    }
}

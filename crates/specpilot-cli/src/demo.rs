//! Scripted demo conversations.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use specpilot_orchestrator::{SessionService, SessionSnapshot};

use crate::cli::DemoScenario;
use crate::commands::{print_outcome, Result};

impl DemoScenario {
    /// Lowercase name, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ecommerce => "ecommerce",
            Self::Booking => "booking",
            Self::Intranet => "intranet",
            Self::Chat => "chat",
            Self::Iot => "iot",
        }
    }

    /// Opening project description.
    pub fn request(&self) -> &'static str {
        match self {
            Self::Ecommerce => {
                "온라인 쇼핑몰을 만들고 싶습니다. 결제와 회원가입 기능이 필요합니다."
            }
            Self::Booking => {
                "헤어샵 예약 서비스를 만들고 싶어요. 고객이 원하는 시간에 예약할 수 있어야 해요."
            }
            Self::Intranet => "사내 인트라넷 전자결재 시스템을 만들려고 합니다.",
            Self::Chat => "실시간 채팅 메신저 앱을 만들고 싶어요.",
            Self::Iot => "공장 설비의 IoT 센서 데이터를 모니터링하는 대시보드를 만들고 싶어요.",
        }
    }

    /// Answers fed in order, one per pending question.
    pub fn answers(&self) -> &'static [&'static str] {
        match self {
            Self::Ecommerce => &[
                "카카오 로그인으로 회원 인증을 하려고 해요",
                "AWS에 배포할 예정입니다",
                "동시 접속자는 1만 명 정도 예상합니다",
                "결제는 토스페이먼츠를 사용할게요",
                "관리자 페이지도 필요합니다",
            ],
            Self::Booking => &[
                "네이버 로그인을 사용할게요",
                "카카오페이로 예약금 결제를 받으려고 해요",
                "월 5천 명 정도 이용할 것 같아요",
                "GCP에 배포하려고 합니다",
            ],
            Self::Intranet => &[
                "LDAP 계정으로 SSO 로그인을 하려고 해요",
                "임직원 500명이 사용합니다",
                "사내 서버에 온프레미스로 배포합니다",
            ],
            Self::Chat => &[
                "구글 로그인을 지원해주세요",
                "동시 접속자 2만 명을 예상해요",
                "AWS에 배포할게요",
            ],
            Self::Iot => &[
                "관리자 계정으로 이메일 로그인을 하면 됩니다",
                "센서 3,000대를 연결하고 사용자는 200명 정도예요",
                "AWS 클라우드에 배포할게요",
            ],
        }
    }
}

/// Runs a scenario, printing each exchange.
///
/// Stops early once the session completes.
pub async fn run(
    service: &SessionService,
    scenario: DemoScenario,
    echo: bool,
) -> Result<SessionSnapshot> {
    let request = scenario.request();
    if echo {
        println!("👤 {}", request);
    }
    let mut snapshot = service.start_session(request).await?;

    for answer in scenario.answers() {
        if snapshot.is_complete {
            break;
        }
        if echo {
            if let Some(question) = snapshot.questions.first() {
                println!("🤖 {}", question);
            }
            println!("👤 {}", answer);
        }
        snapshot = service.continue_session(&snapshot.session_id, answer).await?;
    }

    if echo {
        if let Some(feedback) = &snapshot.judge_feedback {
            println!("⚖️  {}", feedback);
        }
    }
    Ok(snapshot)
}

/// Runs every scenario in turn and prints each outcome.
///
/// With `output_dir`, each finished SRS is saved as `<scenario>.md` there.
pub async fn run_all(
    service: &SessionService,
    echo: bool,
    output_dir: Option<&Path>,
) -> Result<Vec<SessionSnapshot>> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    let mut snapshots = Vec::new();
    for scenario in DemoScenario::value_variants() {
        if echo {
            println!("\n=== {} ===\n", scenario.name());
        }
        let snapshot = run(service, *scenario, echo).await?;
        let path = output_dir.map(|dir| dir.join(format!("{}.md", scenario.name())));
        print_outcome(&snapshot, path.as_deref())?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

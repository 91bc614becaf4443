//! Project classification shared by every agent.
//!
//! The orchestrator computes [`ProjectSignals`] once per pass and hands the
//! same value to the Consultant, Judge and Writer so they never disagree
//! about what kind of project is being described.

use specpilot_models::RequirementState;

use crate::extractor::headcount;

/// Headcount at which a project counts as large-scale.
pub const LARGE_SCALE_USERS: u64 = 100_000;

const ECOMMERCE: &[&str] = &[
    "쇼핑몰", "쇼핑", "이커머스", "커머스", "e-commerce", "ecommerce", "장바구니", "오픈마켓",
    "스토어", "상품 판매",
];
const SOCIAL: &[&str] = &[
    "sns", "소셜 네트워크", "소셜 미디어", "커뮤니티", "팔로우", "피드", "social network",
];
const BOOKING: &[&str] = &["예약", "예매", "booking", "reservation"];
const DELIVERY: &[&str] = &["배달", "delivery", "음식 주문", "라이더"];
const INTRANET: &[&str] = &[
    "인트라넷", "그룹웨어", "intranet", "전자결재", "사내 시스템", "사내 포털", "임직원",
];
const REALTIME: &[&str] = &[
    "실시간", "채팅", "메신저", "chat", "websocket", "웹소켓", "라이브", "스트리밍",
];
const IOT: &[&str] = &["iot", "사물인터넷", "센서", "스마트홈", "디바이스"];
const CONTENT: &[&str] = &["블로그", "cms", "콘텐츠", "뉴스", "게시판", "미디어"];
const MOBILE: &[&str] = &["모바일", "앱", "ios", "android", "안드로이드", "아이폰"];
const SEO: &[&str] = &["seo", "검색 노출", "검색엔진", "마케팅", "랜딩"];
const ADMIN: &[&str] = &["관리자", "어드민", "admin", "백오피스", "대시보드"];
const LARGE_SCALE: &[&str] = &["대규모", "대용량", "수십만", "수백만", "글로벌"];

/// What kind of project the conversation describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectSignals {
    pub ecommerce: bool,
    pub social: bool,
    pub booking: bool,
    pub delivery: bool,
    pub intranet: bool,
    pub realtime: bool,
    pub iot: bool,
    pub content: bool,
    pub mobile: bool,
    pub seo: bool,
    pub admin: bool,
    pub large_scale: bool,
}

impl ProjectSignals {
    /// Classifies free text by case-insensitive keyword presence.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        Self {
            ecommerce: any(ECOMMERCE),
            social: any(SOCIAL),
            booking: any(BOOKING),
            delivery: any(DELIVERY),
            intranet: any(INTRANET),
            realtime: any(REALTIME),
            iot: any(IOT),
            content: any(CONTENT),
            mobile: any(MOBILE),
            seo: any(SEO),
            admin: any(ADMIN),
            large_scale: any(LARGE_SCALE),
        }
    }

    /// Classifies a session from its initial request, latest input and
    /// collected project type. A collected scale of 100,000 users or more
    /// also marks the project as large-scale.
    pub fn for_state(state: &RequirementState) -> Self {
        let info = &state.collected_info;
        let mut text = state.initial_request().to_string();
        if state.user_input != text {
            text.push('\n');
            text.push_str(&state.user_input);
        }
        if let Some(project_type) = info.project_type.as_deref() {
            text.push('\n');
            text.push_str(project_type);
        }

        let mut signals = Self::classify(&text);
        if let Some(users) = info.scale.as_deref().and_then(headcount) {
            if users >= LARGE_SCALE_USERS {
                signals.large_scale = true;
            }
        }
        signals
    }

    /// Payment is mandatory for commerce and for public booking services.
    pub fn requires_payment(&self) -> bool {
        self.ecommerce || (self.booking && !self.intranet)
    }

    /// True when no domain-specific signal fired.
    pub fn is_generic(&self) -> bool {
        !(self.ecommerce || self.social || self.booking || self.delivery || self.intranet)
    }
}

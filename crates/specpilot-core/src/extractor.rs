//! Keyword and pattern extraction of requirement categories.
//!
//! Each category has a keyword gate and a normalizer. A category is
//! reported only when the gate fires, the normalizer produces a canonical
//! value, and the category is not already known.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use specpilot_models::{Category, CollectedInfo, ExtractedInfo};

/// A surface-form table entry: any needle maps to the canonical label.
struct Alias {
    needles: &'static [&'static str],
    canonical: &'static str,
}

const fn alias(needles: &'static [&'static str], canonical: &'static str) -> Alias {
    Alias { needles, canonical }
}

enum Normalizer {
    /// First matching alias wins. `ignore` tokens are removed from the text
    /// before matching so that brand names of another category do not leak.
    Aliases {
        table: &'static [Alias],
        ignore: &'static [&'static str],
    },
    Scale,
}

struct Rule {
    category: Category,
    keywords: &'static [&'static str],
    normalizer: Normalizer,
}

impl Rule {
    fn fires(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k))
    }
}

const PAYMENT_KEYWORDS: &[&str] = &[
    "결제", "카드", "가상계좌", "간편결제", "pg", "payment", "페이먼츠", "카카오페이", "kakaopay",
    "kakao pay", "네이버페이", "naverpay", "naver pay", "나이스페이", "nicepay", "nice페이", "토스",
    "toss", "stripe", "스트라이프", "paypal", "페이팔", "이니시스", "inicis", "계좌이체", "무통장",
];

const PAYMENT_ALIASES: &[Alias] = &[
    alias(&["카카오페이", "kakaopay", "kakao pay"], "카카오페이"),
    alias(&["네이버페이", "naverpay", "naver pay"], "네이버페이"),
    alias(&["토스", "toss"], "토스페이먼츠"),
    alias(&["이니시스", "inicis"], "KG이니시스"),
    alias(&["나이스페이", "nicepay", "nice페이"], "NICE페이먼츠"),
    alias(&["stripe", "스트라이프"], "Stripe"),
    alias(&["paypal", "페이팔"], "PayPal"),
    alias(&["신용카드", "카드"], "신용카드"),
    alias(&["가상계좌"], "가상계좌"),
    alias(&["계좌이체", "무통장"], "계좌이체"),
    alias(&["간편결제"], "간편결제"),
];

const AUTH_KEYWORDS: &[&str] = &[
    "인증", "로그인", "회원", "계정", "oauth", "jwt", "sso", "소셜", "ldap", "login", "sign in",
];

const AUTH_ALIASES: &[Alias] = &[
    alias(&["카카오"], "카카오 로그인"),
    alias(&["네이버"], "네이버 로그인"),
    alias(&["구글", "google"], "구글 로그인"),
    alias(&["애플", "apple"], "애플 로그인"),
    alias(&["소셜"], "소셜 로그인"),
    alias(&["oauth"], "OAuth 2.0"),
    alias(&["jwt", "토큰"], "JWT"),
    alias(&["sso", "싱글 사인온"], "SSO"),
    alias(&["ldap", "active directory"], "LDAP"),
    alias(&["본인인증", "휴대폰"], "휴대폰 본인인증"),
    alias(&["이메일", "email", "아이디", "비밀번호"], "이메일/비밀번호"),
];

const AUTH_IGNORE: &[&str] = &["카카오페이", "네이버페이", "google cloud", "구글 클라우드"];

const DEPLOYMENT_KEYWORDS: &[&str] = &[
    "배포", "서버", "호스팅", "aws", "아마존", "gcp", "azure", "애저", "클라우드", "cloud",
    "온프레미스", "on-prem", "on prem", "amazon", "ec2", "idc", "vercel", "heroku", "netlify", "kubernetes", "쿠버네티스", "k8s",
    "docker", "도커",
];

const DEPLOYMENT_ALIASES: &[Alias] = &[
    alias(&["aws", "amazon", "아마존", "ec2"], "AWS"),
    alias(&["gcp", "google cloud", "구글 클라우드"], "GCP"),
    alias(&["azure", "애저"], "Azure"),
    alias(
        &["온프레미스", "on-prem", "on prem", "자체 서버", "사내 서버", "idc"],
        "온프레미스",
    ),
    alias(&["vercel"], "Vercel"),
    alias(&["heroku"], "Heroku"),
    alias(&["netlify"], "Netlify"),
    alias(&["kubernetes", "쿠버네티스", "k8s"], "Kubernetes"),
    alias(&["docker", "도커"], "Docker"),
    alias(&["클라우드", "cloud"], "클라우드"),
];

const SCALE_KEYWORDS: &[&str] = &[
    "명", "사용자", "이용자", "접속", "트래픽", "규모", "dau", "mau", "users", "people",
];

const PROJECT_TYPE_KEYWORDS: &[&str] = &[
    "쇼핑", "커머스", "commerce", "마켓", "스토어", "상품 판매", "배달", "delivery", "음식 주문",
    "예약", "예매", "booking", "reservation", "인트라넷", "그룹웨어", "intranet", "전자결재",
    "sns", "소셜 네트워크", "소셜 미디어", "커뮤니티", "채팅", "메신저", "chat", "iot", "사물인터넷", "센서", "스마트홈",
    "블로그", "cms", "콘텐츠", "뉴스", "미디어", "앱", "어플", "웹사이트", "홈페이지", "서비스",
    "플랫폼", "시스템",
];

const PROJECT_TYPE_ALIASES: &[Alias] = &[
    alias(
        &["쇼핑", "마켓", "이커머스", "커머스", "commerce", "스토어", "상품 판매"],
        "이커머스",
    ),
    alias(&["배달", "delivery", "음식 주문"], "배달 플랫폼"),
    alias(
        &["인트라넷", "그룹웨어", "intranet", "전자결재", "사내 시스템", "사내 포털"],
        "사내 인트라넷",
    ),
    alias(&["예약", "예매", "booking", "reservation"], "예약 서비스"),
    alias(
        &["sns", "소셜 네트워크", "소셜 미디어", "커뮤니티", "social network"],
        "소셜 네트워크",
    ),
    alias(&["채팅", "메신저", "chat"], "실시간 채팅"),
    alias(&["iot", "사물인터넷", "센서", "스마트홈"], "IoT 플랫폼"),
    alias(&["블로그", "cms", "콘텐츠", "뉴스", "미디어"], "콘텐츠 플랫폼"),
    alias(
        &["앱", "어플", "웹사이트", "홈페이지", "서비스", "플랫폼", "시스템"],
        "웹/앱 서비스",
    ),
];

const RULES: &[Rule] = &[
    Rule {
        category: Category::Payment,
        keywords: PAYMENT_KEYWORDS,
        normalizer: Normalizer::Aliases {
            table: PAYMENT_ALIASES,
            ignore: &[],
        },
    },
    Rule {
        category: Category::Authentication,
        keywords: AUTH_KEYWORDS,
        normalizer: Normalizer::Aliases {
            table: AUTH_ALIASES,
            ignore: AUTH_IGNORE,
        },
    },
    Rule {
        category: Category::Deployment,
        keywords: DEPLOYMENT_KEYWORDS,
        normalizer: Normalizer::Aliases {
            table: DEPLOYMENT_ALIASES,
            ignore: &[],
        },
    },
    Rule {
        category: Category::Scale,
        keywords: SCALE_KEYWORDS,
        normalizer: Normalizer::Scale,
    },
    Rule {
        category: Category::ProjectType,
        keywords: PROJECT_TYPE_KEYWORDS,
        normalizer: Normalizer::Aliases {
            table: PROJECT_TYPE_ALIASES,
            ignore: &[],
        },
    },
];

#[derive(Clone, Copy)]
enum Unit {
    /// `N만 M천`, two captures.
    Compound,
    TenThousand,
    Thousand,
    One,
}

struct ScalePattern {
    regex: Regex,
    unit: Unit,
}

impl ScalePattern {
    fn count(&self, caps: &Captures<'_>) -> Option<u64> {
        let number = caps.get(1)?.as_str();
        match self.unit {
            Unit::Compound => {
                let man = to_count(number, 10_000.0)?;
                let cheon = to_count(caps.get(2)?.as_str(), 1_000.0)?;
                man.checked_add(cheon)
            }
            Unit::TenThousand => to_count(number, 10_000.0),
            Unit::Thousand => to_count(number, 1_000.0),
            Unit::One => to_count(number, 1.0),
        }
    }
}

const NUMBER: &str = r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)";

fn build_patterns(patterns: &[(&str, Unit)]) -> Vec<ScalePattern> {
    patterns
        .iter()
        .map(|(pattern, unit)| ScalePattern {
            regex: Regex::new(&pattern.replace("{n}", NUMBER)).expect("Invalid regex pattern"),
            unit: *unit,
        })
        .collect()
}

fn scale_patterns() -> &'static [ScalePattern] {
    static PATTERNS: OnceLock<Vec<ScalePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        build_patterns(&[
            (r"(\d+)\s*만\s*(\d+)\s*천\s*명", Unit::Compound),
            (r"{n}\s*만\s*명", Unit::TenThousand),
            (r"{n}\s*천\s*명", Unit::Thousand),
            (r"{n}\s*명", Unit::One),
            (r"(?i){n}\s*(?:users|people)", Unit::One),
        ])
    })
}

fn headcount_patterns() -> &'static [ScalePattern] {
    static PATTERNS: OnceLock<Vec<ScalePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        build_patterns(&[
            (r"(\d+)\s*만\s*(\d+)\s*천", Unit::Compound),
            (r"{n}\s*만", Unit::TenThousand),
            (r"{n}\s*천", Unit::Thousand),
            (r"{n}", Unit::One),
        ])
    })
}

fn to_count(number: &str, multiplier: f64) -> Option<u64> {
    let value: f64 = number.replace(',', "").parse().ok()?;
    Some((value * multiplier).round() as u64)
}

/// Renders a headcount as `N만 명`, `N천 명` or `N명`.
pub fn format_headcount(count: u64) -> String {
    if count >= 10_000 {
        if count % 10_000 == 0 {
            format!("{}만 명", count / 10_000)
        } else {
            let man = format!("{:.1}", count as f64 / 10_000.0);
            let man = man.trim_end_matches('0').trim_end_matches('.');
            format!("{}만 명", man)
        }
    } else if count >= 1_000 && count % 1_000 == 0 {
        format!("{}천 명", count / 1_000)
    } else {
        format!("{}명", count)
    }
}

/// Parses a normalized scale string back into a number of users.
pub fn headcount(scale: &str) -> Option<u64> {
    headcount_patterns()
        .iter()
        .find_map(|p| p.regex.captures(scale).and_then(|caps| p.count(&caps)))
}

/// Normalizes the quantity that appears first in the text.
fn normalize_scale(text: &str) -> Option<String> {
    scale_patterns()
        .iter()
        .filter_map(|p| {
            let caps = p.regex.captures(text)?;
            let start = caps.get(0)?.start();
            p.count(&caps).map(|count| (start, count))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, count)| format_headcount(count))
}

fn normalize_aliases(
    lower: &str,
    table: &'static [Alias],
    ignore: &'static [&'static str],
) -> Option<String> {
    let mut text = lower.to_string();
    for token in ignore {
        text = text.replace(token, " ");
    }
    table
        .iter()
        .find(|a| a.needles.iter().any(|n| text.contains(n)))
        .map(|a| a.canonical.to_string())
}

/// Stateless category extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoExtractor;

impl InfoExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts categories from `text` that are not already in `existing`.
    ///
    /// Empty text yields an empty map. Categories whose keyword fires but
    /// whose value cannot be normalized are left out.
    pub fn extract(&self, text: &str, existing: &CollectedInfo) -> ExtractedInfo {
        let mut found = ExtractedInfo::new();
        if text.trim().is_empty() {
            return found;
        }
        let lower = text.to_lowercase();

        for rule in RULES {
            if existing.contains(rule.category) {
                continue;
            }
            if !rule.fires(&lower) {
                continue;
            }
            let value = match &rule.normalizer {
                Normalizer::Aliases { table, ignore } => normalize_aliases(&lower, table, ignore),
                Normalizer::Scale => normalize_scale(text),
            };
            if let Some(value) = value {
                found.insert(rule.category, value);
            }
        }

        found
    }
}

//! Collected requirement information.
//!
//! The categories the Judge and Writer depend on are fixed fields; raw
//! conversation turns that have not been categorized live in a separate
//! ordered backup bag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Backup key under which the first user turn is stored.
pub const INITIAL_REQUEST_KEY: &str = "initial_request";

/// A named slot in the collected information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Payment method / PG provider.
    Payment,
    /// Authentication method.
    Authentication,
    /// Deployment target.
    Deployment,
    /// Expected user scale.
    Scale,
    /// Kind of project (e-commerce, booking, ...).
    ProjectType,
}

impl Category {
    /// All categories, in extraction order.
    pub const ALL: [Category; 5] = [
        Category::Payment,
        Category::Authentication,
        Category::Deployment,
        Category::Scale,
        Category::ProjectType,
    ];

    /// Key used in the flat JSON representation.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Authentication => "authentication",
            Self::Deployment => "deployment",
            Self::Scale => "scale",
            Self::ProjectType => "project_type",
        }
    }

    /// Human-readable (Korean) label used in feedback and documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Payment => "결제 수단",
            Self::Authentication => "인증 방식",
            Self::Deployment => "배포 환경",
            Self::Scale => "예상 규모",
            Self::ProjectType => "프로젝트 유형",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Newly discovered category values from one piece of text.
pub type ExtractedInfo = BTreeMap<Category, String>;

/// Everything collected so far in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedInfo {
    /// Payment method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,

    /// Authentication method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,

    /// Deployment target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    /// Normalized user scale (e.g. "1만 명").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,

    /// Project type label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,

    /// Raw turns keyed by `initial_request` / `response_<n>`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CollectedInfo {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, category: Category) -> &Option<String> {
        match category {
            Category::Payment => &self.payment,
            Category::Authentication => &self.authentication,
            Category::Deployment => &self.deployment,
            Category::Scale => &self.scale,
            Category::ProjectType => &self.project_type,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Payment => &mut self.payment,
            Category::Authentication => &mut self.authentication,
            Category::Deployment => &mut self.deployment,
            Category::Scale => &mut self.scale,
            Category::ProjectType => &mut self.project_type,
        }
    }

    /// Returns the value of a category, if collected.
    pub fn get(&self, category: Category) -> Option<&str> {
        self.slot(category).as_deref()
    }

    /// Returns true if the category has a value.
    pub fn contains(&self, category: Category) -> bool {
        self.slot(category).is_some()
    }

    /// Sets a category, overwriting any previous value.
    pub fn set(&mut self, category: Category, value: impl Into<String>) {
        *self.slot_mut(category) = Some(value.into());
    }

    /// Merges extracted values without overwriting existing ones.
    ///
    /// Returns the categories that were actually filled.
    pub fn apply(&mut self, extracted: ExtractedInfo) -> Vec<Category> {
        let mut filled = Vec::new();
        for (category, value) in extracted {
            let slot = self.slot_mut(category);
            if slot.is_none() {
                *slot = Some(value);
                filled.push(category);
            }
        }
        filled
    }

    /// Categories that currently have a value, in [`Category::ALL`] order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Number of distinct categories collected (backup turns excluded).
    pub fn category_count(&self) -> usize {
        self.categories().len()
    }

    /// Stores a raw turn in the backup bag.
    pub fn record_turn(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.extra.insert(key.into(), text.into());
    }

    /// The first user turn, if recorded.
    pub fn initial_request(&self) -> Option<&str> {
        self.extra.get(INITIAL_REQUEST_KEY).map(String::as_str)
    }

    /// Returns true if nothing at all has been collected.
    pub fn is_empty(&self) -> bool {
        self.category_count() == 0 && self.extra.is_empty()
    }
}

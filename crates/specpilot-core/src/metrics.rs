//! Completeness metrics over the mandatory categories.

use specpilot_models::{Category, CollectedInfo};

use crate::signals::ProjectSignals;

/// Categories that must be collected before an SRS can be written.
pub fn mandatory_categories(signals: &ProjectSignals) -> Vec<Category> {
    let mut categories = Vec::with_capacity(4);
    if signals.requires_payment() {
        categories.push(Category::Payment);
    }
    categories.extend([Category::Authentication, Category::Deployment, Category::Scale]);
    categories
}

/// Mandatory categories not yet collected, in asking order.
pub fn missing_categories(info: &CollectedInfo, signals: &ProjectSignals) -> Vec<Category> {
    mandatory_categories(signals)
        .into_iter()
        .filter(|c| !info.contains(*c))
        .collect()
}

/// Number of distinct categories required by the fallback rule.
pub fn required_count(signals: &ProjectSignals) -> usize {
    if signals.requires_payment() {
        5
    } else {
        4
    }
}

/// Fraction of mandatory categories collected, rounded to two decimals.
pub fn completeness(info: &CollectedInfo, signals: &ProjectSignals) -> f64 {
    let mandatory = mandatory_categories(signals);
    let collected = mandatory.iter().filter(|c| info.contains(**c)).count();
    let ratio = collected as f64 / mandatory.len() as f64;
    (ratio * 100.0).round() / 100.0
}

/// The rule-based completion check used whenever the LLM opinion is
/// unavailable: enough distinct categories and none of the mandatory ones
/// missing.
pub fn deterministic_approval(info: &CollectedInfo, signals: &ProjectSignals) -> bool {
    info.category_count() >= required_count(signals)
        && missing_categories(info, signals).is_empty()
}

/// Snapshot of how far a session has come.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub completeness: f64,
    pub missing: Vec<Category>,
    pub collected: usize,
    pub required: usize,
}

/// Builds a [`QualityReport`] for the collected information.
pub fn assess(info: &CollectedInfo, signals: &ProjectSignals) -> QualityReport {
    QualityReport {
        completeness: completeness(info, signals),
        missing: missing_categories(info, signals),
        collected: info.category_count(),
        required: required_count(signals),
    }
}

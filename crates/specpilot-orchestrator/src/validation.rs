//! Boundary validation of user text.

use crate::error::{Result, ServiceError};

pub const INITIAL_INPUT_MIN: usize = 10;
pub const INITIAL_INPUT_MAX: usize = 5000;
pub const RESPONSE_MIN: usize = 1;
pub const RESPONSE_MAX: usize = 2000;

fn bounded(field: &str, raw: &str, min: usize, max: usize) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ServiceError::Validation(format!("{} must not be empty", field)));
    }
    let len = text.chars().count();
    if len < min || len > max {
        return Err(ServiceError::Validation(format!(
            "{} must be between {} and {} characters (got {})",
            field, min, max, len
        )));
    }
    Ok(text.to_string())
}

/// Trims and length-checks the first description of a project.
pub fn initial_input(raw: &str) -> Result<String> {
    bounded("initial_input", raw, INITIAL_INPUT_MIN, INITIAL_INPUT_MAX)
}

/// Trims and length-checks an answer to a pending question.
pub fn user_response(raw: &str) -> Result<String> {
    bounded("user_response", raw, RESPONSE_MIN, RESPONSE_MAX)
}

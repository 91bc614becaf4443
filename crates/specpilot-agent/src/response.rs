//! Agent step outcomes.

/// What happened when an agent ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The agent ran with provider output (or needed none).
    Completed,
    /// The agent used its fixed fallback behaviour.
    Fallback {
        /// Why the fallback was taken.
        reason: String,
    },
    /// The agent had nothing to do.
    Skipped,
}

impl StepOutcome {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::Fallback {
            reason: reason.into(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Fallback { reason } => write!(f, "fallback ({})", reason),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_helpers() {
        let outcome = StepOutcome::fallback("no provider credential configured");
        assert!(outcome.is_fallback());
        assert_eq!(
            outcome.to_string(),
            "fallback (no provider credential configured)"
        );
        assert!(StepOutcome::Skipped.is_skipped());
        assert!(!StepOutcome::Completed.is_fallback());
    }
}

//! Error types for the agent crate.

use thiserror::Error;

/// Errors that can occur while talking to a text-generation provider.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The provider answered successfully but produced no completion.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// Response parsing failed.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AgentError {
    /// True if retrying the same request may succeed.
    ///
    /// Network failures, rate limiting (429) and server errors (5xx) are
    /// transient; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::Http {
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "provider returned HTTP 503: overloaded");

        let err = AgentError::Network("connection reset".into());
        assert_eq!(err.to_string(), "network error: connection reset");
    }

    #[test]
    fn test_transient_classification() {
        assert!(AgentError::Network("timeout".into()).is_transient());
        assert!(AgentError::Http { status: 429, body: String::new() }.is_transient());
        assert!(AgentError::Http { status: 502, body: String::new() }.is_transient());
        assert!(!AgentError::Http { status: 401, body: String::new() }.is_transient());
        assert!(!AgentError::ResponseParse("bad json".into()).is_transient());
        assert!(!AgentError::Configuration("missing key".into()).is_transient());
    }

    #[test]
    fn test_model_invocation_is_permanent() {
        let err = AgentError::ModelInvocation("no choices".into());
        assert_eq!(err.to_string(), "model invocation failed: no choices");
        assert!(!err.is_transient());
    }
}

//! Text-generation gateway.
//!
//! [`LlmGateway`] wraps a [`TextGenerator`] with a retry policy and a
//! deterministic stub. Callers never see an error: they get a
//! [`Generation`] that is either the provider's text or the stub text
//! tagged with the reason the provider was not used.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use specpilot_core::Settings;
use tracing::{debug, warn};

use crate::client::OpenRouterClient;
use crate::config::ModelConfig;
use crate::error::Result;

/// Text returned by the stub generator.
pub const STUB_RESPONSE: &str = "This is a deterministic stub response.";

/// A provider that turns prompts into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Generate text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text for a user message under a system prompt.
    async fn generate_with_context(&self, system: &str, user: &str) -> Result<String>;
}

/// Offline generator that always returns [`STUB_RESPONSE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGenerator;

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(STUB_RESPONSE.to_string())
    }

    async fn generate_with_context(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(STUB_RESPONSE.to_string())
    }
}

/// Retry settings: `max_attempts` total tries, sleeping
/// `attempt × base_delay` after each transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.llm_max_attempts, settings.llm_retry_delay)
    }

    /// Delay before the attempt following attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Why the stub text was used instead of provider output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No provider credential is configured.
    NoCredential,
    /// The provider answered with empty text.
    EmptyResponse,
    /// The provider failed; retries (if any) were exhausted.
    Failed { attempts: u32, error: String },
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCredential => write!(f, "no provider credential configured"),
            Self::EmptyResponse => write!(f, "provider returned an empty response"),
            Self::Failed { attempts, error } => {
                write!(f, "provider failed after {} attempt(s): {}", attempts, error)
            }
        }
    }
}

/// Outcome of a gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Text produced by the provider.
    Generated(String),
    /// Deterministic stub text and the reason it was used.
    Fallback { text: String, reason: FallbackReason },
}

impl Generation {
    /// The text regardless of where it came from.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { text, .. } => text,
        }
    }

    /// Provider text, if the provider was used.
    pub fn generated(&self) -> Option<&str> {
        match self {
            Self::Generated(text) => Some(text),
            Self::Fallback { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

enum Request<'a> {
    Prompt(&'a str),
    WithContext { system: &'a str, user: &'a str },
}

impl Request<'_> {
    async fn send(&self, generator: &dyn TextGenerator) -> Result<String> {
        match self {
            Self::Prompt(prompt) => generator.generate(prompt).await,
            Self::WithContext { system, user } => {
                generator.generate_with_context(system, user).await
            }
        }
    }
}

/// Gateway in front of the text-generation provider.
#[derive(Clone)]
pub struct LlmGateway {
    generator: Option<Arc<dyn TextGenerator>>,
    stub: StubGenerator,
    retry: RetryPolicy,
}

impl LlmGateway {
    /// Gateway over a real provider.
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self {
            generator: Some(generator),
            stub: StubGenerator,
            retry,
        }
    }

    /// Gateway with no provider; every call falls back to the stub.
    pub fn stub() -> Self {
        Self {
            generator: None,
            stub: StubGenerator,
            retry: RetryPolicy::default(),
        }
    }

    /// OpenRouter when a credential is configured, the stub otherwise.
    pub fn from_settings(settings: &Settings) -> Self {
        let config = ModelConfig::from_settings(settings);
        match OpenRouterClient::from_config(config) {
            Ok(client) => Self::new(Arc::new(client), RetryPolicy::from_settings(settings)),
            Err(_) => Self::stub(),
        }
    }

    /// True if no provider is configured.
    pub fn is_stub(&self) -> bool {
        self.generator.is_none()
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &str {
        match &self.generator {
            Some(generator) => generator.name(),
            None => self.stub.name(),
        }
    }

    /// Generate text for a single prompt.
    pub async fn generate(&self, prompt: &str) -> Generation {
        self.complete(Request::Prompt(prompt)).await
    }

    /// Generate text for a user message under a system prompt.
    pub async fn generate_with_context(&self, system: &str, user: &str) -> Generation {
        self.complete(Request::WithContext { system, user }).await
    }

    async fn complete(&self, request: Request<'_>) -> Generation {
        let Some(generator) = &self.generator else {
            return self.fallback(FallbackReason::NoCredential).await;
        };

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match request.send(generator.as_ref()).await {
                Ok(text) if text.trim().is_empty() => {
                    warn!(provider = generator.name(), "Provider returned an empty response");
                    return self.fallback(FallbackReason::EmptyResponse).await;
                }
                Ok(text) => {
                    debug!(provider = generator.name(), attempt, "Generation succeeded");
                    return Generation::Generated(text.trim().to_string());
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        provider = generator.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient provider error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(
                        provider = generator.name(),
                        attempt,
                        error = %e,
                        "Provider call failed"
                    );
                    return self
                        .fallback(FallbackReason::Failed {
                            attempts: attempt,
                            error: e.to_string(),
                        })
                        .await;
                }
            }
        }
    }

    async fn fallback(&self, reason: FallbackReason) -> Generation {
        let text = self
            .stub
            .generate("")
            .await
            .unwrap_or_else(|_| STUB_RESPONSE.to_string());
        Generation::Fallback { text, reason }
    }
}

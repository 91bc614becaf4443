//! OpenRouter API client for chat completions.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ModelConfig;
use crate::error::{AgentError, Result};
use crate::gateway::TextGenerator;

/// Environment variable for OpenRouter API key.
pub const OPENROUTER_API_KEY_ENV: &str = specpilot_core::config::API_KEY_ENV;

/// OpenRouter chat completions endpoint.
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Per-request deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenRouter API client for chat completions.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    config: ModelConfig,
}

impl OpenRouterClient {
    /// Create a new client with the given API key and model configuration.
    pub fn new(api_key: impl Into<String>, config: ModelConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into(),
            config,
        }
    }

    /// Create a client from the configuration's API key.
    pub fn from_config(config: ModelConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AgentError::Configuration(format!(
                "Missing {} environment variable",
                OPENROUTER_API_KEY_ENV
            ))
        })?;
        Ok(Self::new(api_key, config))
    }

    /// The model configuration used for requests.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Send a chat completion request.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        trace!("Sending chat request: {:?}", request);

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "SpecPilot")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ResponseParse(format!("Failed to parse response: {}", e)))?;

        debug!(
            model = %self.config.model,
            "Chat response received: {} tokens used",
            response.usage.as_ref().map_or(0, |u| u.total_tokens)
        );

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt)]).await?.into_text()
    }

    async fn generate_with_context(&self, system: &str, user: &str) -> Result<String> {
        self.chat(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .await?
            .into_text()
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,

    /// Conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: String,

    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion.
    #[serde(default)]
    pub id: String,

    /// Completion choices.
    pub choices: Vec<ChatChoice>,

    /// Token usage information.
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Text of the first choice; a response without choices is an error.
    pub fn into_text(self) -> Result<String> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            AgentError::ModelInvocation(format!("response {} contained no choices", self.id))
        })?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// A choice in the completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Index of this choice.
    #[serde(default)]
    pub index: u32,

    /// The message for this choice.
    pub message: ResponseMessage,

    /// Finish reason (stop, length, etc.).
    pub finish_reason: Option<String>,
}

/// Message in a completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Role (always "assistant" for responses).
    pub role: String,

    /// Text content of the response.
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,

    /// Tokens in the completion.
    pub completion_tokens: u32,

    /// Total tokens used.
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_message_constructors() {
        let system = ChatMessage::system("You are helpful.");
        assert_eq!(system.role, "system");
        assert_eq!(system.content, "You are helpful.");

        let user = ChatMessage::user("Hello");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "google/gemini-2.5-flash".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            max_tokens: Some(256),
            temperature: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "google/gemini-2.5-flash");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 256);
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_chat_response_parsing() {
        let body = json!({
            "id": "gen-123",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "어떤 결제 수단을 사용하시나요?"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18}
        });

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.content(), Some("어떤 결제 수단을 사용하시나요?"));
        assert_eq!(response.usage.unwrap().total_tokens, 18);
    }

    #[test]
    fn test_chat_response_without_choices() {
        let response: ChatResponse =
            serde_json::from_value(json!({"id": "gen-9", "choices": []})).unwrap();
        assert!(response.content().is_none());

        let err = response.into_text().unwrap_err();
        assert!(matches!(err, AgentError::ModelInvocation(_)));
        assert!(err.to_string().contains("gen-9"));
    }

    #[test]
    fn test_into_text_with_null_content_is_empty() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "");
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = OpenRouterClient::from_config(ModelConfig::default()).err().unwrap();
        assert!(matches!(err, AgentError::Configuration(_)));

        let client =
            OpenRouterClient::from_config(ModelConfig::new("m").with_api_key("sk")).unwrap();
        assert_eq!(client.name(), "openrouter");
        assert_eq!(client.config().model, "m");
    }
}

//! Model configuration for the text-generation provider.

use serde::{Deserialize, Serialize};
use specpilot_core::Settings;

/// Model configuration for the agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "google/gemini-2.5-flash").
    pub model: String,

    /// Maximum tokens to generate in responses.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for response generation (0.0 to 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// API key; never serialized.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: specpilot_core::config::DEFAULT_MODEL.into(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_key: None,
        }
    }
}

impl ModelConfig {
    /// Create a new model configuration with the given model ID.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Derive the configuration from application settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let config = Self::new(&settings.model).with_temperature(settings.temperature);
        match &settings.api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.model, "google/gemini-2.5-flash");
        assert_eq!(config.max_tokens, 1024);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_settings_carries_credential() {
        let settings = Settings::default();
        assert!(ModelConfig::from_settings(&settings).api_key.is_none());

        let settings = Settings {
            api_key: Some("sk-test".into()),
            temperature: 0.2,
            ..Settings::default()
        };
        let config = ModelConfig::from_settings(&settings);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn test_temperature_clamping() {
        let config = ModelConfig::default().with_temperature(5.0);
        assert_eq!(config.temperature, 2.0);

        let config = ModelConfig::default().with_temperature(-1.0);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = ModelConfig::new("test-model").with_api_key("secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        let parsed: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, "test-model");
        assert!(parsed.api_key.is_none());
    }
}

//! Shared configuration for SpecPilot.
//!
//! Settings come from the process environment, optionally seeded from
//! dotenv files. All values have defaults so a bare `specpilot serve`
//! runs against the deterministic stub generator.
//!
//! # Environment Variables
//!
//! - `SPECPILOT_HOST` / `SPECPILOT_PORT`: API bind address
//! - `OPENROUTER_API_KEY`: provider credential (unset selects the stub)
//! - `SPECPILOT_MODEL`, `SPECPILOT_TEMPERATURE`: generation parameters
//! - `SPECPILOT_MAX_ITERATIONS`: Judge forced-completion ceiling
//! - `SPECPILOT_LLM_MAX_ATTEMPTS`, `SPECPILOT_LLM_RETRY_DELAY_MS`: gateway retries
//! - `SPECPILOT_SESSION_DIR`: persist sessions as JSON files in this directory
//! - `SPECPILOT_STATE_DIR`: override the base state directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Environment variable for the API bind host.
pub const HOST_ENV: &str = "SPECPILOT_HOST";

/// Environment variable for the API bind port.
pub const PORT_ENV: &str = "SPECPILOT_PORT";

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable for the model id.
pub const MODEL_ENV: &str = "SPECPILOT_MODEL";

/// Environment variable for the sampling temperature.
pub const TEMPERATURE_ENV: &str = "SPECPILOT_TEMPERATURE";

/// Environment variable for the Judge iteration ceiling.
pub const MAX_ITERATIONS_ENV: &str = "SPECPILOT_MAX_ITERATIONS";

/// Environment variable for gateway attempts per call.
pub const LLM_MAX_ATTEMPTS_ENV: &str = "SPECPILOT_LLM_MAX_ATTEMPTS";

/// Environment variable for the gateway backoff base in milliseconds.
pub const LLM_RETRY_DELAY_ENV: &str = "SPECPILOT_LLM_RETRY_DELAY_MS";

/// Environment variable selecting file-backed session storage.
pub const SESSION_DIR_ENV: &str = "SPECPILOT_SESSION_DIR";

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "SPECPILOT_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".specpilot";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;
pub const DEFAULT_LLM_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_LLM_RETRY_DELAY_MS: u64 = 1000;

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime settings for every SpecPilot interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Provider credential; `None` means the stub generator is used.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_iterations: u32,
    pub llm_max_attempts: u32,
    pub llm_retry_delay: Duration,
    /// When set, sessions are stored as JSON files under this directory.
    pub session_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            llm_max_attempts: DEFAULT_LLM_MAX_ATTEMPTS,
            llm_retry_delay: Duration::from_millis(DEFAULT_LLM_RETRY_DELAY_MS),
            session_dir: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let temperature = parse_or(get(TEMPERATURE_ENV), TEMPERATURE_ENV, defaults.temperature)?;
        let retry_ms = parse_or(
            get(LLM_RETRY_DELAY_ENV),
            LLM_RETRY_DELAY_ENV,
            DEFAULT_LLM_RETRY_DELAY_MS,
        )?;
        let max_attempts: u32 =
            parse_or(get(LLM_MAX_ATTEMPTS_ENV), LLM_MAX_ATTEMPTS_ENV, defaults.llm_max_attempts)?;

        Ok(Self {
            host: get(HOST_ENV).unwrap_or(defaults.host),
            port: parse_or(get(PORT_ENV), PORT_ENV, defaults.port)?,
            api_key: get(API_KEY_ENV),
            model: get(MODEL_ENV).unwrap_or(defaults.model),
            temperature: temperature.clamp(0.0, 2.0),
            max_iterations: parse_or(
                get(MAX_ITERATIONS_ENV),
                MAX_ITERATIONS_ENV,
                defaults.max_iterations,
            )?,
            llm_max_attempts: max_attempts.max(1),
            llm_retry_delay: Duration::from_millis(retry_ms),
            session_dir: get(SESSION_DIR_ENV)
                .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned())),
        })
    }

    /// Returns `host:port` for binding the API server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True if a provider credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

/// Get the SpecPilot state directory.
///
/// 1. `SPECPILOT_STATE_DIR` if set
/// 2. `~/.specpilot` if a home directory is available
/// 3. `.specpilot` in the current directory
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the .env.local file path in the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(".env.local")
}

/// Loads dotenv files into the process environment.
///
/// The state-directory `.env.local` is read first, then `./.env.local`,
/// falling back to `./.env`. Variables already set are never overridden.
/// Returns the files that were loaded.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    let global = env_file();
    if try_load(&global) {
        loaded.push(global);
    }

    let local = PathBuf::from(".env.local");
    if try_load(&local) {
        loaded.push(local);
    } else if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    loaded
}

fn try_load(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded environment file");
            true
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Failed to load environment file");
            false
        }
    }
}

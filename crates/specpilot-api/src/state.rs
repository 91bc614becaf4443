//! Application state shared across handlers.

use std::sync::Arc;

use specpilot_core::Settings;
use specpilot_orchestrator::SessionService;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub service: Arc<SessionService>,
}

impl AppState {
    pub fn new(config: ApiConfig, service: SessionService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            ApiConfig::from_settings(settings),
            SessionService::from_settings(settings),
        )
    }
}

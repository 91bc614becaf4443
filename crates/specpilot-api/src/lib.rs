//! REST API for SpecPilot.
//!
//! Exposes the session operations of
//! [`SessionService`](specpilot_orchestrator::SessionService) over HTTP:
//! start and continue a requirements conversation, inspect its status,
//! collected information and quality, reset it, and export the SRS as
//! JSON or Markdown.
//!
//! # Example
//!
//! ```ignore
//! use specpilot_api::{serve, AppState};
//! use specpilot_core::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     serve(AppState::from_settings(&settings)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;

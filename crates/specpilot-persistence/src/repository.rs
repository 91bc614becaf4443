//! The session repository seam.

use async_trait::async_trait;
use specpilot_models::{RequirementState, SessionId};

use crate::error::Result;

/// Keyed storage of session state.
///
/// Implementations must be safe to share across tasks. Serializing
/// concurrent passes on the same session is the caller's job.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Short backend name for logging.
    fn backend(&self) -> &'static str;

    /// Inserts or replaces the state stored under `id`.
    async fn save(&self, id: &SessionId, state: &RequirementState) -> Result<()>;

    /// Returns the state stored under `id`, if any.
    async fn load(&self, id: &SessionId) -> Result<Option<RequirementState>>;

    /// Removes `id`; returns whether it existed.
    async fn delete(&self, id: &SessionId) -> Result<bool>;

    /// All stored session ids, sorted.
    async fn list(&self) -> Result<Vec<SessionId>>;

    /// Returns true if `id` is stored.
    async fn exists(&self, id: &SessionId) -> Result<bool> {
        Ok(self.load(id).await?.is_some())
    }
}

//! In-memory session repository.

use std::collections::HashMap;

use async_trait::async_trait;
use specpilot_models::{RequirementState, SessionId};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::repository::SessionRepository;

/// Process-local store backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, RequirementState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, id: &SessionId, state: &RequirementState) -> Result<()> {
        self.sessions.write().await.insert(id.clone(), state.clone());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<Option<RequirementState>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<SessionId>> {
        let mut ids: Vec<SessionId> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn exists(&self, id: &SessionId) -> Result<bool> {
        Ok(self.sessions.read().await.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specpilot_models::Category;

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = MemorySessionStore::new();
        let id = SessionId::from("s-1");
        let mut state = RequirementState::new();
        state.iteration_count = 3;

        assert!(store.load(&id).await.unwrap().is_none());
        store.save(&id, &state).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(state));
        assert!(store.exists(&id).await.unwrap());

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = MemorySessionStore::new();
        let a = SessionId::from("a");
        let b = SessionId::from("b");
        store.save(&a, &RequirementState::new()).await.unwrap();
        store.save(&b, &RequirementState::new()).await.unwrap();

        let mut state = store.load(&a).await.unwrap().unwrap();
        state.collected_info.set(Category::Scale, "1만 명");
        store.save(&a, &state).await.unwrap();

        let other = store.load(&b).await.unwrap().unwrap();
        assert!(other.collected_info.scale.is_none());
        assert_eq!(store.list().await.unwrap(), vec![a, b]);
        assert_eq!(store.len().await, 2);
    }
}

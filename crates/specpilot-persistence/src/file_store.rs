//! File-backed session repository.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use specpilot_models::{RequirementState, SessionId};
use tracing::warn;

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};
use crate::repository::SessionRepository;

/// Stores each session as one JSON document:
/// ```text
/// base_path/
/// ├── 0b6f...e2.json
/// └── demo-session.json
/// ```
///
/// Ids outside `[A-Za-z0-9_-]` are never mapped to a path. Loading or
/// deleting them reports "not found" and saving them is an error.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl FileSessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn session_path(&self, id: &SessionId) -> Option<PathBuf> {
        is_safe_id(id.as_str()).then(|| self.base_path.join(format!("{}.json", id)))
    }

    fn list_blocking(base: &Path) -> Result<Vec<SessionId>> {
        if !base.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(base).map_err(|source| PersistenceError::ReadError {
            path: base.to_path_buf(),
            source,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: base.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if is_safe_id(stem) => ids.push(SessionId::from(stem)),
                _ => warn!(path = %path.display(), "Skipping unrecognised session file"),
            }
        }
        ids.sort();
        Ok(ids)
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PersistenceError::TaskFailed(e.to_string()))?
}

#[async_trait]
impl SessionRepository for FileSessionStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn save(&self, id: &SessionId, state: &RequirementState) -> Result<()> {
        let path = self
            .session_path(id)
            .ok_or_else(|| PersistenceError::InvalidId(id.to_string()))?;
        let state = state.clone();
        blocking(move || atomic_write_json(&path, &state)).await
    }

    async fn load(&self, id: &SessionId) -> Result<Option<RequirementState>> {
        let Some(path) = self.session_path(id) else {
            return Ok(None);
        };
        blocking(move || read_json_optional(&path)).await
    }

    async fn delete(&self, id: &SessionId) -> Result<bool> {
        let Some(path) = self.session_path(id) else {
            return Ok(false);
        };
        blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PersistenceError::WriteError { path, source }),
        })
        .await
    }

    async fn list(&self) -> Result<Vec<SessionId>> {
        let base = self.base_path.clone();
        blocking(move || Self::list_blocking(&base)).await
    }
}

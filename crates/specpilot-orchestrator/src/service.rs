//! Session lifecycle operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use specpilot_core::{assess, ProjectSignals, Settings};
use specpilot_models::{RequirementState, SessionId};
use specpilot_persistence::{FileSessionStore, MemorySessionStore, SessionRepository};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::validation;
use crate::view::{
    CollectedInfoView, QualityView, SessionSnapshot, SessionStatus, SrsExport, SrsFormat,
    SrsPayload,
};
use crate::workflow::Workflow;

type SessionLock = Arc<AsyncMutex<()>>;

/// Owns the repository and the workflow and exposes the session operations.
///
/// Passes on the same session id are serialized through a per-session
/// async mutex; passes on different ids run concurrently.
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    workflow: Workflow,
    locks: Mutex<HashMap<SessionId, SessionLock>>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>, workflow: Workflow) -> Self {
        Self {
            repository,
            workflow,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Service with an in-memory repository.
    pub fn in_memory(workflow: Workflow) -> Self {
        Self::new(Arc::new(MemorySessionStore::new()), workflow)
    }

    /// Builds the provider, workflow and repository described by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let workflow = Workflow::from_settings(settings);
        let repository: Arc<dyn SessionRepository> = match &settings.session_dir {
            Some(dir) => Arc::new(FileSessionStore::new(dir)),
            None => Arc::new(MemorySessionStore::new()),
        };
        info!(
            provider = workflow.provider_name(),
            backend = repository.backend(),
            max_iterations = workflow.max_iterations(),
            "Session service ready"
        );
        Self::new(repository, workflow)
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn repository(&self) -> &Arc<dyn SessionRepository> {
        &self.repository
    }

    fn session_lock(&self, id: &SessionId) -> SessionLock {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    /// Drops the lock entry for `id` unless another task still holds it.
    fn release_lock(&self, id: &SessionId) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(id);
        }
    }

    async fn require(&self, id: &SessionId) -> Result<RequirementState> {
        self.repository
            .load(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    /// Creates a session from a project description and runs the first pass.
    pub async fn start_session(&self, initial_input: &str) -> Result<SessionSnapshot> {
        let input = validation::initial_input(initial_input)?;
        let id = SessionId::new();

        let mut state = RequirementState::new();
        self.workflow.run_pass(&mut state, &input).await;
        self.repository.save(&id, &state).await?;

        info!(session_id = %id, "Session started");
        Ok(SessionSnapshot::new(id, &state))
    }

    /// Feeds an answer into an existing session and runs one pass.
    pub async fn continue_session(
        &self,
        id: &SessionId,
        user_response: &str,
    ) -> Result<SessionSnapshot> {
        let input = validation::user_response(user_response)?;

        let lock = self.session_lock(id);
        let result = {
            let _guard = lock.lock().await;
            match self.repository.load(id).await {
                Ok(Some(mut state)) => {
                    let report = self.workflow.run_pass(&mut state, &input).await;
                    self.repository.save(id, &state).await?;
                    if report.completed_now {
                        info!(session_id = %id, iteration = report.iteration, "Session complete");
                    }
                    Ok(SessionSnapshot::new(id.clone(), &state))
                }
                Ok(None) => Err(ServiceError::NotFound(id.clone())),
                Err(e) => Err(e.into()),
            }
        };
        drop(lock);

        if matches!(result, Err(ServiceError::NotFound(_))) {
            self.release_lock(id);
        }
        result
    }

    pub async fn status(&self, id: &SessionId) -> Result<SessionStatus> {
        let state = self.require(id).await?;
        Ok(SessionStatus {
            session_id: id.clone(),
            phase: state.phase(),
            is_complete: state.is_complete,
            iteration_count: state.iteration_count,
        })
    }

    pub async fn collected_info(&self, id: &SessionId) -> Result<CollectedInfoView> {
        let state = self.require(id).await?;
        Ok(CollectedInfoView {
            session_id: id.clone(),
            collected_info: state.collected_info,
        })
    }

    /// Completeness of the collected information.
    pub async fn quality(&self, id: &SessionId) -> Result<QualityView> {
        let state = self.require(id).await?;
        let report = assess(&state.collected_info, &ProjectSignals::for_state(&state));
        Ok(QualityView {
            session_id: id.clone(),
            completeness: report.completeness,
            missing: report.missing.iter().map(|c| c.label().to_string()).collect(),
            collected: report.collected,
            required: report.required,
        })
    }

    /// Deletes a session so its id becomes unknown.
    pub async fn reset_session(&self, id: &SessionId) -> Result<()> {
        let lock = self.session_lock(id);
        let deleted = {
            let _guard = lock.lock().await;
            self.repository.delete(id).await?
        };
        drop(lock);
        self.release_lock(id);

        if deleted {
            info!(session_id = %id, "Session reset");
            Ok(())
        } else {
            Err(ServiceError::NotFound(id.clone()))
        }
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionId>> {
        Ok(self.repository.list().await?)
    }

    /// The session's SRS in the requested format, if written.
    pub async fn get_srs(&self, id: &SessionId, format: SrsFormat) -> Result<SrsExport> {
        let state = self.require(id).await?;
        debug!(session_id = %id, ?format, "Exporting SRS");
        Ok(SrsExport {
            session_id: id.clone(),
            final_srs: state
                .final_srs
                .as_ref()
                .map(|document| SrsPayload::render(document, format)),
            is_complete: state.is_complete,
        })
    }
}

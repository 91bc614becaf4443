//! Persistence layer for SpecPilot sessions.
//!
//! Sessions live behind the [`SessionRepository`] trait. Two backends ship
//! with the crate: [`MemorySessionStore`] for a single process and
//! [`FileSessionStore`], which writes one JSON document per session using
//! atomic temp-file-then-rename writes.
//!
//! ```no_run
//! use specpilot_models::{RequirementState, SessionId};
//! use specpilot_persistence::{FileSessionStore, SessionRepository};
//!
//! # async fn demo() -> specpilot_persistence::Result<()> {
//! let store = FileSessionStore::new("/tmp/specpilot/sessions");
//! let id = SessionId::new();
//! store.save(&id, &RequirementState::new()).await?;
//! let loaded = store.load(&id).await?;
//! assert!(loaded.is_some());
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod repository;

pub use error::{PersistenceError, Result};
pub use file_store::FileSessionStore;
pub use memory_store::MemorySessionStore;
pub use repository::SessionRepository;

//! Workflow orchestration for SpecPilot.
//!
//! [`Workflow`] runs one orchestrator pass (extraction, Consultant, Judge,
//! conditional Writer) over a [`RequirementState`](specpilot_models::RequirementState).
//! [`SessionService`] wraps it with validation, a session repository and
//! per-session serialization, and is what every interface talks to.

pub mod error;
pub mod service;
pub mod validation;
pub mod view;
pub mod workflow;

pub use error::{Result, ServiceError};
pub use service::SessionService;
pub use view::{
    CollectedInfoView, QualityView, SessionSnapshot, SessionStatus, SrsExport, SrsFormat,
    SrsPayload,
};
pub use workflow::{PassReport, Workflow};

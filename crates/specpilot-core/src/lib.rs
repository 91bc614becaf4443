//! SpecPilot Core - shared business logic for all SpecPilot interfaces.
//!
//! - **config**: Environment-driven [`Settings`] and dotenv loading
//! - **extractor**: Keyword/pattern extraction of requirement categories
//! - **signals**: One shared classification of what kind of project is described
//! - **metrics**: Completeness scoring over the mandatory categories
//! - **formatter**: Markdown rendering of an SRS document

pub mod config;
pub mod extractor;
pub mod formatter;
pub mod metrics;
pub mod signals;

pub use config::{ConfigError, Settings};
pub use extractor::{headcount, InfoExtractor};
pub use formatter::to_markdown;
pub use metrics::{
    assess, completeness, deterministic_approval, mandatory_categories, missing_categories,
    required_count, QualityReport,
};
pub use signals::ProjectSignals;

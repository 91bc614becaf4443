//! API request handlers.

pub mod health;
pub mod session;
pub mod srs;

pub use health::*;
pub use session::*;
pub use srs::*;

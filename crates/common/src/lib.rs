//! talereel Common Utilities
//!
//! Shared infrastructure for all talereel crates:
//! - Error taxonomy and result aliases
//! - Clock-style time formatting for scene reports
//! - Retry policy for external collaborator calls
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod retry;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use retry::RetryPolicy;

//! # briefwise-core
//!
//! Core types, traits, and abstractions for the briefwise research pipeline.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other briefwise crates depend on: the research-job and brief models,
//! the repository and provider capability traits, the shared error type, and
//! the deep-merge utility used by the brief aggregation step.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod merge;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use merge::deep_merge;
pub use models::*;
pub use traits::*;

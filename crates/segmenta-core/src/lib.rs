//! # segmenta-core
//!
//! Core types, traits, and abstractions for segmenta.
//!
//! This crate provides the foundational data structures and trait
//! definitions that other segmenta crates depend on: the persona/keyword
//! domain model, the reclassification job model, the backend API contract,
//! the error taxonomy, input normalization, and the structured logging
//! schema.

pub mod api;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;

// Re-export commonly used types at crate root
pub use api::{AddKeywordRequest, BulkAddKeywordsRequest, ClassifierApi};
pub use error::{Error, Result};
pub use models::*;
pub use normalize::{contains_keyword, normalize_title};

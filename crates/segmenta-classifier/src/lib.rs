//! # segmenta-classifier
//!
//! Priority-ordered keyword classification for segmenta.
//!
//! This crate provides:
//! - The matching engine: normalized substring matching with
//!   lowest-priority-wins selection and a catch-all fallback
//! - The keyword set: normalization, per-persona uniqueness, bulk
//!   ingestion counts, and a configurable cross-persona replace policy
//! - Persona ordering: the pure `reorder` list transform and 1-based rank
//!   management with the catch-all pinned last
//!
//! ## Example
//!
//! ```ignore
//! use segmenta_classifier::ClassifierEngine;
//!
//! let engine = ClassifierEngine::new(personas, keywords)?;
//! let result = engine.classify("Director de Marketing Digital");
//! assert!(!result.is_default);
//! ```

pub mod engine;
pub mod ordering;
pub mod registry;

pub use engine::ClassifierEngine;
pub use ordering::{reorder, PersonaOrder};
pub use registry::{InsertOutcome, KeywordSet, ReplacePolicy};

//! # segmenta-client
//!
//! Backend API client implementations for segmenta.
//!
//! This crate provides:
//! - [`HttpClassifierBackend`]: the `reqwest`-based client against the
//!   marketing-ops REST backend, with env-driven configuration and
//!   status→error mapping
//! - [`MockClassifierBackend`]: a deterministic in-memory backend driven
//!   by the real classification engine, for tests
//!
//! Both implement [`segmenta_core::ClassifierApi`]; consumers hold an
//! `Arc<dyn ClassifierApi>` and never care which one they talk to.

pub mod http;
pub mod mock;

pub use http::HttpClassifierBackend;
pub use mock::{MockCall, MockClassifierBackend};

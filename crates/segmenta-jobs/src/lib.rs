//! # segmenta-jobs
//!
//! Reclassification job tracking for segmenta.
//!
//! This crate provides:
//! - A local job board with monotonic status transitions (a terminal job
//!   never reverts to a non-terminal state, whatever a stale poll says)
//! - A cancellable polling monitor that fetches job status on a fixed
//!   interval while any watched job is live, idles once everything is
//!   terminal, and swallows poll failures until the next tick
//! - Job creation, cancellation (server-acknowledged, never optimistic),
//!   and impact estimation pass-throughs
//!
//! ## Example
//!
//! ```ignore
//! use segmenta_jobs::{JobMonitor, MonitorConfig};
//!
//! let monitor = JobMonitor::new(api, MonitorConfig::default());
//! let handle = monitor.start();
//!
//! let job = monitor.create_job(JobType::AllContacts, true).await?;
//!
//! let mut events = handle.events();
//! while let Ok(event) = events.recv().await {
//!     println!("Event: {:?}", event);
//! }
//!
//! handle.shutdown().await?;
//! ```

pub mod monitor;
pub mod state;

pub use monitor::{JobMonitor, MonitorConfig, MonitorHandle, DEFAULT_POLL_INTERVAL_MS};
pub use state::{Applied, JobBoard, JobEvent};

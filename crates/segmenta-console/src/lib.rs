//! # segmenta-console
//!
//! Console-facing services for the segmenta persona classifier: the
//! keyword registry, the persona priority board, the diagnostic panel,
//! and error→notice conversion.
//!
//! Each service wraps an `Arc<dyn ClassifierApi>` and owns the
//! client-side contract the views rely on: validation before network
//! calls, optimistic updates with rollback, serialized priority saves,
//! and re-entry guards on running operations. All ambient UI state is
//! explicit (state enums, in-flight flags) rather than implicit booleans
//! scattered across views.

pub mod diagnostic;
pub mod notice;
pub mod priorities;
pub mod registry;

pub use diagnostic::{AnnotatedMatch, DiagnosticPanel, DiagnosticReport, DiagnosticState};
pub use notice::{Notice, NoticeLevel};
pub use priorities::PriorityBoard;
pub use registry::{KeywordRegistry, PersonaKeywords};

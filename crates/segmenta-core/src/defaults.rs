//! Centralized default constants for the segmenta system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// BACKEND API
// =============================================================================

/// Default base URL of the marketing-ops REST backend.
pub const API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Timeout for backend HTTP requests in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// JOB MONITORING
// =============================================================================

/// Polling interval while any reclassification job is non-terminal
/// (milliseconds). Matches the 5s cadence the console uses.
pub const JOB_POLL_INTERVAL_MS: u64 = 5000;

/// Page size for the job listing endpoint.
pub const JOB_PAGE_LIMIT: i64 = 20;

/// Broadcast channel capacity for job events.
pub const JOB_EVENT_CAPACITY: usize = 256;

/// Maximum sample changes a job carries for display.
pub const SAMPLE_CHANGES_LIMIT: usize = 10;

// =============================================================================
// CONTACT LOOKUP
// =============================================================================

/// Page size for contact search (diagnostic-by-contact flow).
pub const CONTACT_SEARCH_LIMIT: i64 = 10;

// =============================================================================
// KEYWORDS
// =============================================================================

/// Separators accepted by bulk keyword input.
pub const BULK_KEYWORD_SEPARATORS: [char; 3] = [',', ';', '\n'];

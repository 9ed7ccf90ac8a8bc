//! Structured logging schema and field name constants for segmenta.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools can query by standardized field names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (keyword scans, matches) |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "classifier", "client", "jobs", "console"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "engine", "keyword_set", "monitor", "http_backend"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "classify", "add_keyword", "put_priorities", "poll"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Persona UUID being operated on.
pub const PERSONA_ID: &str = "persona_id";

/// Keyword UUID being operated on.
pub const KEYWORD_ID: &str = "keyword_id";

/// Reclassification job UUID being processed.
pub const JOB_ID: &str = "job_id";

/// Job type enum variant.
pub const JOB_TYPE: &str = "job_type";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of keywords evaluated during classification.
pub const KEYWORD_COUNT: &str = "keyword_count";

/// Number of keywords that matched the input.
pub const MATCH_COUNT: &str = "match_count";

/// Number of results returned by a listing or search.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize the global tracing subscriber with env-filter support.
///
/// Reads `RUST_LOG` for filtering (defaults to `info` for segmenta crates).
/// Safe to call once per process; returns quietly if a subscriber is
/// already installed (e.g. in tests).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

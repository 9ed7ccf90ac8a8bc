//! Core data models for segmenta.
//!
//! These types are shared across all segmenta crates and represent the
//! domain entities of the persona classifier: personas, keywords,
//! classification results, and reclassification jobs. Field names follow
//! the backend wire format where they differ from Rust convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PERSONA TYPES
// =============================================================================

/// A buyer persona: a named classification bucket for contacts.
///
/// Lower `priority` wins when multiple personas' keywords match the same
/// input. The catch-all persona always sorts last regardless of its stored
/// priority value and is excluded from manual reordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub display_name: String,
    pub priority: i32,
    #[serde(default)]
    pub is_catch_all: bool,
}

impl Persona {
    /// Effective priority used for sorting and tie-breaks. The catch-all
    /// persona compares after every real priority value.
    pub fn effective_priority(&self) -> i64 {
        if self.is_catch_all {
            i64::MAX
        } else {
            self.priority as i64
        }
    }
}

/// Sort personas for display: by priority ascending, catch-all pinned last.
pub fn sort_personas(personas: &mut [Persona]) {
    personas.sort_by_key(|p| (p.effective_priority(), p.id));
}

/// One entry of the atomic priority save payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityEntry {
    #[serde(rename = "buyer_persona_id")]
    pub persona_id: Uuid,
    pub priority: i32,
}

// =============================================================================
// KEYWORD TYPES
// =============================================================================

/// A keyword→persona assignment. `text` is stored normalized (lowercase,
/// trimmed, punctuation-insensitive) so matching and uniqueness checks
/// compare like with like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub id: Uuid,
    #[serde(rename = "keyword")]
    pub text: String,
    #[serde(rename = "buyer_persona_id")]
    pub persona_id: Uuid,
}

/// Counts returned by a bulk keyword add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAddOutcome {
    pub created: i64,
    pub skipped: i64,
    pub replaced: i64,
}

// =============================================================================
// CLASSIFICATION TYPES
// =============================================================================

/// A single keyword that matched a diagnostic input, annotated with its
/// persona's priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    #[serde(rename = "buyer_persona_id")]
    pub persona_id: Uuid,
    pub priority: i32,
}

/// Outcome of classifying one job title.
///
/// `winning_persona_id` is the persona with the lowest priority among all
/// personas referenced in `matches`. When `matches` is empty the winner is
/// the catch-all persona and `is_default` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub normalized_input: String,
    pub matches: Vec<KeywordMatch>,
    #[serde(rename = "winning_buyer_persona_id")]
    pub winning_persona_id: Uuid,
    pub is_default: bool,
}

impl ClassificationResult {
    /// Priority of the winning match, if any keyword matched.
    pub fn winning_priority(&self) -> Option<i32> {
        self.matches
            .iter()
            .filter(|m| m.persona_id == self.winning_persona_id)
            .map(|m| m.priority)
            .min()
    }
}

// =============================================================================
// CONTACT TYPES
// =============================================================================

/// Minimal contact shape used for diagnostic lookup and dry-run
/// verification. A locked contact is pinned to its persona and excluded
/// from automated reclassification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(rename = "buyer_persona_id", skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<Uuid>,
    #[serde(default)]
    pub locked: bool,
}

// =============================================================================
// RECLASSIFICATION JOB TYPES
// =============================================================================

/// Scope of a batch reclassification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Re-evaluate every unlocked contact.
    AllContacts,
    /// Only contacts with no persona assigned.
    UnassignedOnly,
    /// Only contacts currently on the catch-all persona.
    CatchAllOnly,
}

impl JobType {
    /// Wire name used in endpoint paths and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllContacts => "all_contacts",
            Self::UnassignedOnly => "unassigned_only",
            Self::CatchAllOnly => "catch_all_only",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a reclassification job.
///
/// Transitions are driven entirely by the backend:
/// `pending → processing → {completed, failed, cancelled}`. The terminal
/// states are final; a job never leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// True for `completed`, `failed`, and `cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Per-job progress counters. Locked contacts land in `skipped_locked`
/// and are never mutated by any job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    pub total_contacts: i64,
    pub processed: i64,
    pub updated: i64,
    pub skipped_locked: i64,
    pub failed: i64,
}

/// A before/after example surfaced by a reclassification job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleChange {
    pub job_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_persona: Option<String>,
    pub new_persona: String,
}

/// A batch reclassification job, owned by the backend. The client only
/// reads/polls it and issues cancel requests. A dry-run job reports
/// progress and sample changes without mutating persisted assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclassificationJob {
    pub job_id: Uuid,
    pub job_type: JobType,
    pub dry_run: bool,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: JobProgress,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_changes: Vec<SampleChange>,
}

/// Result of a synchronous scoped reclassification pass
/// (single keyword or single persona).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedReclassifyOutcome {
    pub matched: i64,
    pub updated: i64,
}

/// Dry computation of a job's reach, without creating a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub estimated_contacts: i64,
    #[serde(default)]
    pub sample_contacts: Vec<Contact>,
}

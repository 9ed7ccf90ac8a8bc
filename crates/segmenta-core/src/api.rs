//! Backend API contract for the persona classifier.
//!
//! The REST backend owns all persisted state and the production
//! classification engine; this trait defines the shapes the console
//! expects from it. `segmenta-client` provides the HTTP implementation
//! and an in-memory mock for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Request body for adding a single keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddKeywordRequest {
    pub keyword: String,
    #[serde(rename = "buyer_persona_id")]
    pub persona_id: Uuid,
    #[serde(rename = "buyer_persona_name")]
    pub persona_name: String,
}

/// Request body for bulk keyword submission. `keywords` is the raw
/// user-entered blob; splitting on comma/semicolon/newline happens before
/// submission, but the backend receives the original text in one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAddKeywordsRequest {
    pub keywords: String,
    #[serde(rename = "buyer_persona_id")]
    pub persona_id: Uuid,
    #[serde(rename = "buyer_persona_name")]
    pub persona_name: String,
}

/// Backend API consumed by the persona classifier console.
///
/// All methods are single HTTP round trips; none hold client-side locks.
/// Implementations map backend failures onto the segmenta error taxonomy
/// (409 → `Duplicate`, other non-2xx → `Server`, transport → `Request`).
#[async_trait]
pub trait ClassifierApi: Send + Sync {
    /// Fetch all personas, including the catch-all.
    async fn list_personas(&self) -> Result<Vec<Persona>>;

    /// Fetch all keyword→persona assignments.
    async fn list_keywords(&self) -> Result<Vec<Keyword>>;

    /// Add one keyword. Fails with `Duplicate` if the normalized text
    /// already exists under the target persona.
    async fn add_keyword(&self, req: AddKeywordRequest) -> Result<Keyword>;

    /// Submit a batch of keywords in one request.
    async fn bulk_add_keywords(&self, req: BulkAddKeywordsRequest) -> Result<BulkAddOutcome>;

    /// Delete a keyword. Deleting an id that is already gone is not an
    /// error from the caller's perspective.
    async fn delete_keyword(&self, keyword_id: Uuid) -> Result<()>;

    /// Fetch the current persona priority list.
    async fn get_priorities(&self) -> Result<Vec<PriorityEntry>>;

    /// Persist the full ordered priority list in a single atomic request.
    async fn put_priorities(&self, entries: &[PriorityEntry]) -> Result<()>;

    /// Classify one job title and return the diagnostic breakdown.
    async fn diagnose(&self, job_title: &str) -> Result<ClassificationResult>;

    /// Synchronous scoped pass over contacts matching one keyword.
    async fn reclassify_by_keyword(&self, keyword_id: Uuid) -> Result<ScopedReclassifyOutcome>;

    /// Synchronous scoped pass over contacts assigned to one persona.
    async fn reclassify_by_persona(&self, persona_id: Uuid) -> Result<ScopedReclassifyOutcome>;

    /// Create a trackable batch reclassification job. A dry-run job still
    /// produces progress and sample-change data but must not mutate
    /// persisted contact records.
    async fn create_job(&self, job_type: JobType, dry_run: bool) -> Result<ReclassificationJob>;

    /// List the most recent jobs, newest first.
    async fn list_jobs(&self, limit: i64) -> Result<Vec<ReclassificationJob>>;

    /// Request cancellation of a job. Returns the job as the server
    /// acknowledged it, which may already be `completed` if the job
    /// finished in the interim.
    async fn cancel_job(&self, job_id: Uuid) -> Result<ReclassificationJob>;

    /// Dry computation of a job's reach without creating a job.
    async fn estimate_impact(&self, job_type: JobType) -> Result<ImpactEstimate>;

    /// Search contacts by name or email (diagnostic-by-contact flow).
    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>>;
}

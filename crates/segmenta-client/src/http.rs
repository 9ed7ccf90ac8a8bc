//! HTTP implementation of the backend API contract.
//!
//! Thin typed wrapper over the marketing-ops REST backend: adds the base
//! URL and bearer token, serializes request bodies, and maps response
//! statuses onto the segmenta error taxonomy. No business logic lives
//! here; the backend owns classification, scheduling, and persistence.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use segmenta_core::{
    defaults, AddKeywordRequest, BulkAddKeywordsRequest, BulkAddOutcome, ClassificationResult,
    ClassifierApi, Contact, Error, ImpactEstimate, JobType, Keyword, Persona, PriorityEntry,
    ReclassificationJob, Result, ScopedReclassifyOutcome,
};

/// Default backend base URL.
pub const DEFAULT_API_BASE: &str = defaults::API_BASE_URL;

/// Default request timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = defaults::HTTP_TIMEOUT_SECS;

/// reqwest-backed implementation of [`ClassifierApi`].
pub struct HttpClassifierBackend {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpClassifierBackend {
    /// Create a backend against the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url.into(), None, HTTP_TIMEOUT_SECS)
    }

    /// Create a backend with an explicit token and timeout.
    pub fn with_config(base_url: String, api_token: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            base_url = %base_url,
            has_token = api_token.is_some(),
            "Initializing classifier backend client"
        );

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Create from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `SEGMENTA_API_BASE` | `http://127.0.0.1:8000` | Backend base URL |
    /// | `SEGMENTA_API_TOKEN` | unset | Bearer token |
    /// | `SEGMENTA_HTTP_TIMEOUT_SECS` | `30` | Request timeout |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SEGMENTA_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let api_token = std::env::var("SEGMENTA_API_TOKEN").ok().filter(|t| !t.is_empty());
        let timeout_secs = std::env::var("SEGMENTA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(HTTP_TIMEOUT_SECS);

        Self::with_config(base_url, api_token, timeout_secs)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a response onto the error taxonomy, returning it untouched on
    /// success. 409 becomes `Duplicate`, 404 becomes `NotFound`, any other
    /// non-2xx becomes `Server` with the body captured for the message.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::CONFLICT => Err(Error::Duplicate(if message.is_empty() {
                "already exists".to_string()
            } else {
                message
            })),
            StatusCode::NOT_FOUND => Err(Error::NotFound(message)),
            _ => Err(Error::Server {
                status: status.as_u16(),
                message,
            }),
        }
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {e}")))
    }
}

// Response envelopes the backend wraps collections in.

#[derive(Deserialize)]
struct PersonaListResponse {
    personas: Vec<Persona>,
}

#[derive(Deserialize)]
struct KeywordListResponse {
    keywords: Vec<Keyword>,
}

#[derive(Deserialize)]
struct DiagnoseResponse {
    diagnosis: ClassificationResult,
}

#[derive(Deserialize)]
struct JobListResponse {
    jobs: Vec<ReclassificationJob>,
}

#[derive(Deserialize)]
struct ContactListResponse {
    contacts: Vec<Contact>,
}

#[async_trait]
impl ClassifierApi for HttpClassifierBackend {
    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "list_personas"))]
    async fn list_personas(&self) -> Result<Vec<Persona>> {
        let response = self
            .authorize(self.client.get(self.url("/buyer-personas/")))
            .send()
            .await?;
        let body: PersonaListResponse = Self::parse(Self::check(response).await?).await?;
        debug!(result_count = body.personas.len(), "Listed personas");
        Ok(body.personas)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "list_keywords"))]
    async fn list_keywords(&self) -> Result<Vec<Keyword>> {
        let response = self
            .authorize(self.client.get(self.url("/job-keywords/")))
            .send()
            .await?;
        let body: KeywordListResponse = Self::parse(Self::check(response).await?).await?;
        debug!(result_count = body.keywords.len(), "Listed keywords");
        Ok(body.keywords)
    }

    #[instrument(skip(self, req), fields(subsystem = "client", component = "http_backend", op = "add_keyword"))]
    async fn add_keyword(&self, req: AddKeywordRequest) -> Result<Keyword> {
        let response = self
            .authorize(self.client.post(self.url("/job-keywords/")))
            .json(&req)
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    #[instrument(skip(self, req), fields(subsystem = "client", component = "http_backend", op = "bulk_add_keywords"))]
    async fn bulk_add_keywords(&self, req: BulkAddKeywordsRequest) -> Result<BulkAddOutcome> {
        let response = self
            .authorize(self.client.post(self.url("/job-keywords/bulk")))
            .json(&req)
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "delete_keyword", keyword_id = %keyword_id))]
    async fn delete_keyword(&self, keyword_id: Uuid) -> Result<()> {
        let response = self
            .authorize(
                self.client
                    .delete(self.url(&format!("/job-keywords/{keyword_id}"))),
            )
            .send()
            .await?;
        // Already-gone is the desired state; deletion is idempotent.
        match Self::check(response).await {
            Ok(_) => Ok(()),
            Err(Error::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "get_priorities"))]
    async fn get_priorities(&self) -> Result<Vec<PriorityEntry>> {
        let response = self
            .authorize(self.client.get(self.url("/job-keywords/priorities")))
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    #[instrument(skip(self, entries), fields(subsystem = "client", component = "http_backend", op = "put_priorities", result_count = entries.len()))]
    async fn put_priorities(&self, entries: &[PriorityEntry]) -> Result<()> {
        let response = self
            .authorize(self.client.put(self.url("/job-keywords/priorities")))
            .json(&entries)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self, job_title), fields(subsystem = "client", component = "http_backend", op = "diagnose"))]
    async fn diagnose(&self, job_title: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let response = self
            .authorize(self.client.post(self.url("/persona-classifier/diagnose")))
            .json(&serde_json::json!({ "job_title": job_title }))
            .send()
            .await?;
        let body: DiagnoseResponse = Self::parse(Self::check(response).await?).await?;
        debug!(
            match_count = body.diagnosis.matches.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Diagnosis complete"
        );
        Ok(body.diagnosis)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "reclassify_by_keyword", keyword_id = %keyword_id))]
    async fn reclassify_by_keyword(&self, keyword_id: Uuid) -> Result<ScopedReclassifyOutcome> {
        let response = self
            .authorize(self.client.post(self.url(&format!(
                "/persona-classifier/reclassify-keyword/{keyword_id}"
            ))))
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "reclassify_by_persona", persona_id = %persona_id))]
    async fn reclassify_by_persona(&self, persona_id: Uuid) -> Result<ScopedReclassifyOutcome> {
        let response = self
            .authorize(self.client.post(self.url(&format!(
                "/persona-classifier/reclassify-persona/{persona_id}"
            ))))
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "create_job", job_type = %job_type, dry_run))]
    async fn create_job(&self, job_type: JobType, dry_run: bool) -> Result<ReclassificationJob> {
        let response = self
            .authorize(self.client.post(self.url(&format!(
                "/persona-classifier/reclassify/{}",
                job_type.as_str()
            ))))
            .json(&serde_json::json!({ "dry_run": dry_run }))
            .send()
            .await?;
        let job: ReclassificationJob = Self::parse(Self::check(response).await?).await?;
        info!(job_id = %job.job_id, job_type = %job.job_type, dry_run = job.dry_run, "Created reclassification job");
        Ok(job)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "list_jobs", limit))]
    async fn list_jobs(&self, limit: i64) -> Result<Vec<ReclassificationJob>> {
        let response = self
            .authorize(self.client.get(self.url("/persona-classifier/jobs")))
            .query(&[("limit", limit)])
            .send()
            .await?;
        let body: JobListResponse = Self::parse(Self::check(response).await?).await?;
        Ok(body.jobs)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "cancel_job", job_id = %job_id))]
    async fn cancel_job(&self, job_id: Uuid) -> Result<ReclassificationJob> {
        let response = self
            .authorize(self.client.post(self.url(&format!(
                "/persona-classifier/jobs/{job_id}/cancel"
            ))))
            .send()
            .await?;
        let job: ReclassificationJob = Self::parse(Self::check(response).await?).await?;
        if job.status != segmenta_core::JobStatus::Cancelled {
            warn!(job_id = %job.job_id, status = %job.status, "Cancel acknowledged with non-cancelled status");
        }
        Ok(job)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http_backend", op = "estimate_impact", job_type = %job_type))]
    async fn estimate_impact(&self, job_type: JobType) -> Result<ImpactEstimate> {
        let response = self
            .authorize(
                self.client
                    .post(self.url("/persona-classifier/reclassify/estimate")),
            )
            .query(&[("job_type", job_type.as_str())])
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    #[instrument(skip(self, query), fields(subsystem = "client", component = "http_backend", op = "search_contacts"))]
    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        let response = self
            .authorize(self.client.get(self.url("/contacts")))
            .query(&[("search", query)])
            .send()
            .await?;
        let body: ContactListResponse = Self::parse(Self::check(response).await?).await?;
        Ok(body.contacts)
    }
}

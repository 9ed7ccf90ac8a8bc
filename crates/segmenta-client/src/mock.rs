//! Mock backend for deterministic testing.
//!
//! Implements [`ClassifierApi`] entirely in memory, driven by the real
//! classification engine, so monitor and console tests exercise genuine
//! classification semantics without a network. Job simulation advances one
//! batch of contacts per `list_jobs` poll; dry-run jobs report progress
//! and sample changes but never mutate stored contact assignments.
//!
//! ## Usage
//!
//! ```ignore
//! let backend = MockClassifierBackend::new()
//!     .with_personas(personas)
//!     .with_contacts(contacts)
//!     .with_keyword("director de marketing", mkt_id);
//!
//! let result = backend.diagnose("Director de Marketing Digital").await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use segmenta_classifier::{ClassifierEngine, KeywordSet, PersonaOrder};
use segmenta_core::normalize::{contains_keyword, normalize_title};
use segmenta_core::{
    defaults, AddKeywordRequest, BulkAddKeywordsRequest, BulkAddOutcome, ClassificationResult,
    ClassifierApi, Contact, Error, ImpactEstimate, JobProgress, JobStatus, JobType, Keyword,
    Persona, PriorityEntry, ReclassificationJob, Result, SampleChange, ScopedReclassifyOutcome,
    sort_personas,
};

/// One recorded backend call, for assertions.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub detail: String,
}

struct MockState {
    personas: Vec<Persona>,
    keywords: KeywordSet,
    contacts: Vec<Contact>,
    jobs: Vec<ReclassificationJob>,
    /// Contact ids captured per job at creation time, with a cursor.
    job_scopes: HashMap<Uuid, (Vec<Uuid>, usize)>,
}

/// In-memory [`ClassifierApi`] implementation for tests.
#[derive(Clone)]
pub struct MockClassifierBackend {
    state: Arc<Mutex<MockState>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    fail_remaining: Arc<Mutex<u32>>,
    latency: Duration,
    /// Contacts processed per job per `list_jobs` poll.
    steps_per_poll: i64,
}

impl Default for MockClassifierBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClassifierBackend {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                personas: Vec::new(),
                keywords: KeywordSet::new(),
                contacts: Vec::new(),
                jobs: Vec::new(),
                job_scopes: HashMap::new(),
            })),
            call_log: Arc::new(Mutex::new(Vec::new())),
            fail_remaining: Arc::new(Mutex::new(0)),
            latency: Duration::ZERO,
            steps_per_poll: i64::MAX,
        }
    }

    /// Seed the persona set.
    pub fn with_personas(self, personas: Vec<Persona>) -> Self {
        self.state.lock().unwrap().personas = personas;
        self
    }

    /// Seed the contact list.
    pub fn with_contacts(self, contacts: Vec<Contact>) -> Self {
        self.state.lock().unwrap().contacts = contacts;
        self
    }

    /// Seed one keyword (normalized on insertion).
    pub fn with_keyword(self, text: &str, persona_id: Uuid) -> Self {
        self.state
            .lock()
            .unwrap()
            .keywords
            .insert(text, persona_id)
            .expect("seed keyword");
        self
    }

    /// Simulated latency for every operation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Contacts a running job processes per `list_jobs` poll. Defaults to
    /// "everything at once" so jobs finish on the first poll.
    pub fn with_steps_per_poll(mut self, steps: i64) -> Self {
        self.steps_per_poll = steps.max(1);
        self
    }

    /// Make the next `count` calls fail with a request error, for testing
    /// error handling and poll retry behavior.
    pub fn fail_next_requests(&self, count: u32) {
        *self.fail_remaining.lock().unwrap() = count;
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of calls recorded for one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Current contact snapshot (for asserting dry-run non-mutation).
    pub fn contacts(&self) -> Vec<Contact> {
        self.state.lock().unwrap().contacts.clone()
    }

    async fn begin(&self, operation: &str, detail: impl Into<String>) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            detail: detail.into(),
        });
        let mut remaining = self.fail_remaining.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(Error::Request(format!("injected failure in {operation}")));
        }
        Ok(())
    }

    fn engine(state: &MockState) -> Result<ClassifierEngine> {
        ClassifierEngine::new(state.personas.clone(), state.keywords.keywords())
    }

    fn catch_all_id(state: &MockState) -> Option<Uuid> {
        state.personas.iter().find(|p| p.is_catch_all).map(|p| p.id)
    }

    fn persona_name(state: &MockState, id: Uuid) -> String {
        state
            .personas
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn scope_contact_ids(state: &MockState, job_type: JobType) -> Vec<Uuid> {
        let catch_all = Self::catch_all_id(state);
        state
            .contacts
            .iter()
            .filter(|c| match job_type {
                JobType::AllContacts => true,
                JobType::UnassignedOnly => c.persona_id.is_none(),
                JobType::CatchAllOnly => c.persona_id.is_some() && c.persona_id == catch_all,
            })
            .map(|c| c.id)
            .collect()
    }

    /// Advance every non-terminal job by one poll tick.
    fn advance_jobs(&self, state: &mut MockState) -> Result<()> {
        let engine = Self::engine(state)?;
        let steps = self.steps_per_poll;

        // Split borrows: jobs advance while contacts are read and
        // (for live jobs) written.
        let mut jobs = std::mem::take(&mut state.jobs);
        for job in jobs.iter_mut() {
            if job.status.is_terminal() {
                continue;
            }
            if job.status == JobStatus::Pending {
                job.status = JobStatus::Processing;
                continue;
            }

            let (scope, cursor) = match state.job_scopes.get_mut(&job.job_id) {
                Some(entry) => (&mut entry.0, &mut entry.1),
                None => continue,
            };
            let mut done = 0;
            while *cursor < scope.len() && done < steps {
                let contact_id = scope[*cursor];
                *cursor += 1;
                done += 1;
                job.progress.processed += 1;

                let contact = match state.contacts.iter_mut().find(|c| c.id == contact_id) {
                    Some(c) => c,
                    None => {
                        job.progress.failed += 1;
                        continue;
                    }
                };
                if contact.locked {
                    job.progress.skipped_locked += 1;
                    continue;
                }
                let title = contact.job_title.clone().unwrap_or_default();
                let result = engine.classify(&title);
                let new_persona = result.winning_persona_id;
                if contact.persona_id != Some(new_persona) {
                    job.progress.updated += 1;
                    if job.sample_changes.len() < defaults::SAMPLE_CHANGES_LIMIT {
                        job.sample_changes.push(SampleChange {
                            job_title: title,
                            old_persona: contact
                                .persona_id
                                .map(|id| Self::persona_name_by_ref(&state.personas, id)),
                            new_persona: Self::persona_name_by_ref(&state.personas, new_persona),
                        });
                    }
                    // Dry runs report the change without persisting it.
                    if !job.dry_run {
                        contact.persona_id = Some(new_persona);
                    }
                }
            }
            if *cursor >= scope.len() {
                job.status = JobStatus::Completed;
            }
        }
        state.jobs = jobs;
        Ok(())
    }

    fn persona_name_by_ref(personas: &[Persona], id: Uuid) -> String {
        personas
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[async_trait]
impl ClassifierApi for MockClassifierBackend {
    async fn list_personas(&self) -> Result<Vec<Persona>> {
        self.begin("list_personas", "").await?;
        let mut personas = self.state.lock().unwrap().personas.clone();
        sort_personas(&mut personas);
        Ok(personas)
    }

    async fn list_keywords(&self) -> Result<Vec<Keyword>> {
        self.begin("list_keywords", "").await?;
        Ok(self.state.lock().unwrap().keywords.keywords())
    }

    async fn add_keyword(&self, req: AddKeywordRequest) -> Result<Keyword> {
        self.begin("add_keyword", req.keyword.clone()).await?;
        let mut state = self.state.lock().unwrap();
        let outcome = state.keywords.insert(&req.keyword, req.persona_id)?;
        Ok(outcome.keyword)
    }

    async fn bulk_add_keywords(&self, req: BulkAddKeywordsRequest) -> Result<BulkAddOutcome> {
        self.begin("bulk_add_keywords", req.keywords.clone()).await?;
        let mut state = self.state.lock().unwrap();
        Ok(state.keywords.insert_bulk(&req.keywords, req.persona_id))
    }

    async fn delete_keyword(&self, keyword_id: Uuid) -> Result<()> {
        self.begin("delete_keyword", keyword_id.to_string()).await?;
        self.state.lock().unwrap().keywords.remove(keyword_id);
        Ok(())
    }

    async fn get_priorities(&self) -> Result<Vec<PriorityEntry>> {
        self.begin("get_priorities", "").await?;
        let state = self.state.lock().unwrap();
        Ok(PersonaOrder::from_personas(&state.personas).entries())
    }

    async fn put_priorities(&self, entries: &[PriorityEntry]) -> Result<()> {
        self.begin("put_priorities", format!("{} entries", entries.len()))
            .await?;
        let mut state = self.state.lock().unwrap();
        for entry in entries {
            let persona = state
                .personas
                .iter_mut()
                .find(|p| p.id == entry.persona_id)
                .ok_or_else(|| Error::NotFound(format!("persona {}", entry.persona_id)))?;
            persona.priority = entry.priority;
        }
        Ok(())
    }

    async fn diagnose(&self, job_title: &str) -> Result<ClassificationResult> {
        self.begin("diagnose", job_title.to_string()).await?;
        let state = self.state.lock().unwrap();
        let engine = Self::engine(&state)?;
        Ok(engine.classify(job_title))
    }

    async fn reclassify_by_keyword(&self, keyword_id: Uuid) -> Result<ScopedReclassifyOutcome> {
        self.begin("reclassify_by_keyword", keyword_id.to_string())
            .await?;
        let mut state = self.state.lock().unwrap();
        let keyword = state
            .keywords
            .get(keyword_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("keyword {keyword_id}")))?;
        let engine = Self::engine(&state)?;

        let mut outcome = ScopedReclassifyOutcome::default();
        for contact in state.contacts.iter_mut() {
            let title = contact.job_title.clone().unwrap_or_default();
            if !contains_keyword(&normalize_title(&title), &keyword.text) {
                continue;
            }
            outcome.matched += 1;
            if contact.locked {
                continue;
            }
            let winner = engine.classify(&title).winning_persona_id;
            if contact.persona_id != Some(winner) {
                contact.persona_id = Some(winner);
                outcome.updated += 1;
            }
        }
        Ok(outcome)
    }

    async fn reclassify_by_persona(&self, persona_id: Uuid) -> Result<ScopedReclassifyOutcome> {
        self.begin("reclassify_by_persona", persona_id.to_string())
            .await?;
        let mut state = self.state.lock().unwrap();
        let engine = Self::engine(&state)?;

        let mut outcome = ScopedReclassifyOutcome::default();
        for contact in state.contacts.iter_mut() {
            if contact.persona_id != Some(persona_id) {
                continue;
            }
            outcome.matched += 1;
            if contact.locked {
                continue;
            }
            let title = contact.job_title.clone().unwrap_or_default();
            let winner = engine.classify(&title).winning_persona_id;
            if contact.persona_id != Some(winner) {
                contact.persona_id = Some(winner);
                outcome.updated += 1;
            }
        }
        Ok(outcome)
    }

    async fn create_job(&self, job_type: JobType, dry_run: bool) -> Result<ReclassificationJob> {
        self.begin("create_job", job_type.to_string()).await?;
        let mut state = self.state.lock().unwrap();
        let scope = Self::scope_contact_ids(&state, job_type);
        let job = ReclassificationJob {
            job_id: Uuid::new_v4(),
            job_type,
            dry_run,
            status: JobStatus::Pending,
            progress: JobProgress {
                total_contacts: scope.len() as i64,
                ..JobProgress::default()
            },
            created_at: Utc::now(),
            created_by: Some("mock".to_string()),
            sample_changes: Vec::new(),
        };
        state.job_scopes.insert(job.job_id, (scope, 0));
        state.jobs.push(job.clone());
        Ok(job)
    }

    async fn list_jobs(&self, limit: i64) -> Result<Vec<ReclassificationJob>> {
        self.begin("list_jobs", "").await?;
        let mut state = self.state.lock().unwrap();
        self.advance_jobs(&mut state)?;
        let mut jobs = state.jobs.clone();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit.max(0) as usize);
        Ok(jobs)
    }

    async fn cancel_job(&self, job_id: Uuid) -> Result<ReclassificationJob> {
        self.begin("cancel_job", job_id.to_string()).await?;
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.job_id == job_id)
            .ok_or_else(|| Error::NotFound(format!("job {job_id}")))?;
        // A job that already reached a terminal state is acknowledged
        // as-is; the caller reconciles against it.
        if !job.status.is_terminal() {
            job.status = JobStatus::Cancelled;
        }
        Ok(job.clone())
    }

    async fn estimate_impact(&self, job_type: JobType) -> Result<ImpactEstimate> {
        self.begin("estimate_impact", job_type.to_string()).await?;
        let state = self.state.lock().unwrap();
        let scope = Self::scope_contact_ids(&state, job_type);
        let sample: Vec<Contact> = scope
            .iter()
            .take(defaults::CONTACT_SEARCH_LIMIT as usize)
            .filter_map(|id| state.contacts.iter().find(|c| c.id == *id).cloned())
            .collect();
        Ok(ImpactEstimate {
            estimated_contacts: scope.len() as i64,
            sample_contacts: sample,
        })
    }

    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        self.begin("search_contacts", query.to_string()).await?;
        let needle = query.to_lowercase();
        let state = self.state.lock().unwrap();
        let mut found: Vec<Contact> = state
            .contacts
            .iter()
            .filter(|c| {
                c.full_name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        found.truncate(defaults::CONTACT_SEARCH_LIMIT as usize);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(name: &str, priority: i32, is_catch_all: bool) -> Persona {
        Persona {
            id: Uuid::new_v4(),
            display_name: name.to_string(),
            priority,
            is_catch_all,
        }
    }

    fn contact(name: &str, title: &str, persona_id: Option<Uuid>, locked: bool) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            job_title: Some(title.to_string()),
            persona_id,
            locked,
        }
    }

    fn fixture() -> (Persona, Persona, Persona, MockClassifierBackend) {
        let mkt = persona("Marketing", 1, false);
        let sales = persona("Sales", 2, false);
        let mateo = persona("Mateo", 99, true);
        let backend = MockClassifierBackend::new()
            .with_personas(vec![mkt.clone(), sales.clone(), mateo.clone()])
            .with_keyword("director de marketing", mkt.id)
            .with_keyword("director comercial", sales.id);
        (mkt, sales, mateo, backend)
    }

    #[tokio::test]
    async fn test_diagnose_matches_marketing_scenario() {
        let (mkt, _, _, backend) = fixture();

        let result = backend.diagnose("Director de Marketing Digital").await.unwrap();
        assert_eq!(result.normalized_input, "director de marketing digital");
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].keyword, "director de marketing");
        assert_eq!(result.winning_persona_id, mkt.id);
        assert!(!result.is_default);
    }

    #[tokio::test]
    async fn test_diagnose_falls_through_to_catch_all() {
        let (_, _, mateo, backend) = fixture();

        let result = backend.diagnose("Recepcionista").await.unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.winning_persona_id, mateo.id);
        assert!(result.is_default);
    }

    #[tokio::test]
    async fn test_bulk_add_counts() {
        let (mkt, _, _, backend) = fixture();

        let outcome = backend
            .bulk_add_keywords(BulkAddKeywordsRequest {
                keywords: "CMO; CMO; Head of Marketing".to_string(),
                persona_id: mkt.id,
                persona_name: mkt.display_name.clone(),
            })
            .await
            .unwrap();
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.replaced, 0);
    }

    #[tokio::test]
    async fn test_add_duplicate_keyword_rejected() {
        let (mkt, _, _, backend) = fixture();

        let err = backend
            .add_keyword(AddKeywordRequest {
                keyword: "Director de Marketing".to_string(),
                persona_id: mkt.id,
                persona_name: mkt.display_name.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_delete_keyword_idempotent() {
        let (_, _, _, backend) = fixture();
        assert!(backend.delete_keyword(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_job_reports_updates_without_mutating() {
        let (_, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![
            contact("Ana", "Director de Marketing", Some(mateo.id), false),
            contact("Luis", "Recepcionista", Some(mateo.id), false),
        ]);

        let job = backend.create_job(JobType::AllContacts, true).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress.total_contacts, 2);

        // Poll until the job completes
        let mut last = job;
        for _ in 0..5 {
            let jobs = backend.list_jobs(10).await.unwrap();
            last = jobs.into_iter().find(|j| j.job_id == last.job_id).unwrap();
            if last.status.is_terminal() {
                break;
            }
        }
        assert_eq!(last.status, JobStatus::Completed);
        assert_eq!(last.progress.processed, 2);
        // Ana would move to Marketing
        assert_eq!(last.progress.updated, 1);
        assert_eq!(last.sample_changes.len(), 1);
        assert_eq!(last.sample_changes[0].new_persona, "Marketing");

        // Dry run: persisted assignments unchanged
        for c in backend.contacts() {
            assert_eq!(c.persona_id, Some(mateo.id));
        }
    }

    #[tokio::test]
    async fn test_live_job_mutates_assignments() {
        let (mkt, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![contact(
            "Ana",
            "Director de Marketing",
            Some(mateo.id),
            false,
        )]);

        let job = backend.create_job(JobType::AllContacts, false).await.unwrap();
        let mut last = job;
        for _ in 0..5 {
            let jobs = backend.list_jobs(10).await.unwrap();
            last = jobs.into_iter().find(|j| j.job_id == last.job_id).unwrap();
            if last.status.is_terminal() {
                break;
            }
        }
        assert_eq!(last.status, JobStatus::Completed);
        assert_eq!(backend.contacts()[0].persona_id, Some(mkt.id));
    }

    #[tokio::test]
    async fn test_locked_contacts_skipped_and_untouched() {
        let (_, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![contact(
            "Ana",
            "Director de Marketing",
            Some(mateo.id),
            true,
        )]);

        let job = backend.create_job(JobType::AllContacts, false).await.unwrap();
        let mut last = job;
        for _ in 0..5 {
            let jobs = backend.list_jobs(10).await.unwrap();
            last = jobs.into_iter().find(|j| j.job_id == last.job_id).unwrap();
            if last.status.is_terminal() {
                break;
            }
        }
        assert_eq!(last.progress.skipped_locked, 1);
        assert_eq!(last.progress.updated, 0);
        assert_eq!(backend.contacts()[0].persona_id, Some(mateo.id));
    }

    #[tokio::test]
    async fn test_cancel_processing_job() {
        let (_, _, mateo, backend) = fixture();
        let backend = backend
            .with_contacts(vec![
                contact("Ana", "Director de Marketing", Some(mateo.id), false),
                contact("Luis", "Recepcionista", Some(mateo.id), false),
            ])
            .with_steps_per_poll(1);

        let job = backend.create_job(JobType::AllContacts, false).await.unwrap();
        // First poll: pending → processing
        backend.list_jobs(10).await.unwrap();
        let cancelled = backend.cancel_job(job.job_id).await.unwrap();
        assert_eq!(cancelled.status, JobStatus::Cancelled);

        // Terminal state sticks across later polls
        let jobs = backend.list_jobs(10).await.unwrap();
        let after = jobs.iter().find(|j| j.job_id == job.job_id).unwrap();
        assert_eq!(after.status, JobStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_completed_job_returns_completed() {
        let (_, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![contact(
            "Ana",
            "Recepcionista",
            Some(mateo.id),
            false,
        )]);

        let job = backend.create_job(JobType::AllContacts, false).await.unwrap();
        for _ in 0..5 {
            if backend
                .list_jobs(10)
                .await
                .unwrap()
                .iter()
                .all(|j| j.status.is_terminal())
            {
                break;
            }
        }
        let ack = backend.cancel_job(job.job_id).await.unwrap();
        assert_eq!(ack.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_unassigned_only_scope() {
        let (_, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![
            contact("Ana", "Director de Marketing", None, false),
            contact("Luis", "Recepcionista", Some(mateo.id), false),
        ]);

        let estimate = backend.estimate_impact(JobType::UnassignedOnly).await.unwrap();
        assert_eq!(estimate.estimated_contacts, 1);
        assert_eq!(estimate.sample_contacts[0].full_name, "Ana");
    }

    #[tokio::test]
    async fn test_catch_all_only_scope() {
        let (_, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![
            contact("Ana", "Director de Marketing", None, false),
            contact("Luis", "Recepcionista", Some(mateo.id), false),
        ]);

        let estimate = backend.estimate_impact(JobType::CatchAllOnly).await.unwrap();
        assert_eq!(estimate.estimated_contacts, 1);
        assert_eq!(estimate.sample_contacts[0].full_name, "Luis");
    }

    #[tokio::test]
    async fn test_reclassify_by_persona_scoped() {
        let (mkt, _, mateo, backend) = fixture();
        let backend = backend.with_contacts(vec![
            contact("Ana", "Director de Marketing", Some(mateo.id), false),
            contact("Luis", "Recepcionista", Some(mateo.id), false),
        ]);

        let outcome = backend.reclassify_by_persona(mateo.id).await.unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.updated, 1);
        let contacts = backend.contacts();
        assert_eq!(contacts[0].persona_id, Some(mkt.id));
        assert_eq!(contacts[1].persona_id, Some(mateo.id));
    }

    #[tokio::test]
    async fn test_search_contacts_by_name_and_email() {
        let (_, _, _, backend) = fixture();
        let backend = backend.with_contacts(vec![
            contact("Ana García", "Director de Marketing", None, false),
            contact("Luis Pérez", "Recepcionista", None, false),
        ]);

        let by_name = backend.search_contacts("ana").await.unwrap();
        assert_eq!(by_name.len(), 1);
        let by_email = backend.search_contacts("luis.pérez@example.com").await.unwrap();
        assert_eq!(by_email.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures_then_recovery() {
        let (_, _, _, backend) = fixture();
        backend.fail_next_requests(2);

        assert!(backend.list_keywords().await.is_err());
        assert!(backend.list_keywords().await.is_err());
        assert!(backend.list_keywords().await.is_ok());
        assert_eq!(backend.call_count("list_keywords"), 3);
    }
}

//! Diagnostic panel: classify one job title and show the breakdown.
//!
//! State machine: `Idle → Running → {Resolved, Errored}`. Submission is
//! disabled while `Running`; the classification itself happens on the
//! backend, and the panel annotates the returned matches for display
//! (which keywords carry the winning priority, whether the catch-all
//! fallback fired).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use uuid::Uuid;

use segmenta_core::{ClassificationResult, ClassifierApi, Contact, Error, Result};

/// A match row for display, flagged when it carries the winning priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedMatch {
    pub keyword: String,
    pub persona_id: Uuid,
    pub priority: i32,
    /// True when this match's priority equals the winning priority.
    pub winning: bool,
}

/// Resolved diagnosis, ready to render.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    /// The text as the user entered it.
    pub input: String,
    /// The normalized form the classifier matched against.
    pub normalized_input: String,
    pub winning_persona_id: Uuid,
    /// True when no keyword matched and the catch-all was used.
    pub is_default: bool,
    pub matches: Vec<AnnotatedMatch>,
}

impl DiagnosticReport {
    fn from_result(input: &str, result: ClassificationResult) -> Self {
        let winning_priority = result.winning_priority();
        let matches = result
            .matches
            .iter()
            .map(|m| AnnotatedMatch {
                keyword: m.keyword.clone(),
                persona_id: m.persona_id,
                priority: m.priority,
                winning: Some(m.priority) == winning_priority,
            })
            .collect();
        Self {
            input: input.to_string(),
            normalized_input: result.normalized_input,
            winning_persona_id: result.winning_persona_id,
            is_default: result.is_default,
            matches,
        }
    }
}

/// Panel state. `Running` blocks further submissions.
#[derive(Debug, Clone)]
pub enum DiagnosticState {
    Idle,
    Running,
    Resolved(DiagnosticReport),
    Errored(String),
}

impl DiagnosticState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Console-side diagnostic panel over a backend.
pub struct DiagnosticPanel {
    api: Arc<dyn ClassifierApi>,
    state: Mutex<DiagnosticState>,
    running: AtomicBool,
}

impl DiagnosticPanel {
    pub fn new(api: Arc<dyn ClassifierApi>) -> Self {
        Self {
            api,
            state: Mutex::new(DiagnosticState::Idle),
            running: AtomicBool::new(false),
        }
    }

    /// Current panel state snapshot.
    pub fn state(&self) -> DiagnosticState {
        self.state.lock().unwrap().clone()
    }

    /// Run a diagnosis for free text.
    ///
    /// Empty input fails with `Validation` before any network call. While
    /// a diagnosis is running, further submissions are rejected; the
    /// panel moves to `Resolved` or `Errored` when the round trip ends.
    pub async fn run_diagnosis(&self, text: &str) -> Result<DiagnosticReport> {
        if text.trim().is_empty() {
            return Err(Error::Validation("job title is empty".to_string()));
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::Validation(
                "a diagnosis is already running".to_string(),
            ));
        }
        *self.state.lock().unwrap() = DiagnosticState::Running;

        let outcome = self.api.diagnose(text).await;
        let result = match outcome {
            Ok(result) => {
                let report = DiagnosticReport::from_result(text, result);
                debug!(
                    match_count = report.matches.len(),
                    is_default = report.is_default,
                    "Diagnosis resolved"
                );
                *self.state.lock().unwrap() = DiagnosticState::Resolved(report.clone());
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Diagnosis failed");
                *self.state.lock().unwrap() = DiagnosticState::Errored(e.to_string());
                Err(e)
            }
        };
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Run a diagnosis for an existing contact's job title.
    ///
    /// Convenience composition of contact search and [`run_diagnosis`]:
    /// the first match with a job title is diagnosed. No independent
    /// logic beyond the lookup.
    pub async fn run_for_contact(&self, query: &str) -> Result<(Contact, DiagnosticReport)> {
        if query.trim().is_empty() {
            return Err(Error::Validation("search query is empty".to_string()));
        }
        let contacts = self.api.search_contacts(query).await?;
        let contact = contacts
            .into_iter()
            .find(|c| c.job_title.as_deref().is_some_and(|t| !t.trim().is_empty()))
            .ok_or_else(|| {
                Error::NotFound(format!("no contact with a job title matches {query:?}"))
            })?;

        let title = contact.job_title.clone().unwrap_or_default();
        let report = self.run_diagnosis(&title).await?;
        Ok((contact, report))
    }
}

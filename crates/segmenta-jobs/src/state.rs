//! Job board: local view of reclassification jobs with monotonic status.
//!
//! The backend owns job lifecycles; the board only mirrors what polls and
//! acknowledgments report. Terminal statuses are final — an update that
//! would move a job out of `completed`/`failed`/`cancelled` is stale by
//! definition (e.g. a poll response raced a cancel ack) and is discarded.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use segmenta_core::{JobStatus, ReclassificationJob};

/// Event emitted when the board changes.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// A job appeared or its status/progress changed.
    JobUpdated { job: ReclassificationJob },
    /// A job reached `completed`.
    JobCompleted { job_id: Uuid },
    /// A job reached `failed`.
    JobFailed { job_id: Uuid },
    /// A job reached `cancelled`.
    JobCancelled { job_id: Uuid },
    /// Monitor started polling.
    MonitorStarted,
    /// Monitor stopped.
    MonitorStopped,
}

/// Outcome of applying one job update to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New job, or same status with fresher progress.
    Updated,
    /// The job entered a terminal state with this update.
    ReachedTerminal(JobStatus),
    /// Update discarded: it would regress a terminal status.
    Stale,
    /// Update carried nothing new.
    Unchanged,
}

/// Local mirror of the visible reclassification jobs.
#[derive(Debug, Default)]
pub struct JobBoard {
    jobs: HashMap<Uuid, ReclassificationJob>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one update, enforcing monotonic status transitions.
    pub fn apply(&mut self, update: ReclassificationJob) -> Applied {
        match self.jobs.get(&update.job_id) {
            None => {
                let applied = if update.status.is_terminal() {
                    Applied::ReachedTerminal(update.status)
                } else {
                    Applied::Updated
                };
                self.jobs.insert(update.job_id, update);
                applied
            }
            Some(existing) => {
                if existing.status.is_terminal() {
                    if update.status != existing.status || !update.status.is_terminal() {
                        warn!(
                            job_id = %update.job_id,
                            current = %existing.status,
                            incoming = %update.status,
                            "Discarding stale job update against terminal status"
                        );
                        return Applied::Stale;
                    }
                    // Same terminal status again; keep the newer payload
                    // (final progress counts, sample changes).
                    self.jobs.insert(update.job_id, update);
                    return Applied::Unchanged;
                }

                let status_changed = existing.status != update.status;
                let progress_changed = existing.progress != update.progress;
                let reached_terminal = update.status.is_terminal();
                let new_status = update.status;
                self.jobs.insert(update.job_id, update);

                if reached_terminal {
                    Applied::ReachedTerminal(new_status)
                } else if status_changed || progress_changed {
                    Applied::Updated
                } else {
                    Applied::Unchanged
                }
            }
        }
    }

    /// Look up one job.
    pub fn get(&self, job_id: Uuid) -> Option<&ReclassificationJob> {
        self.jobs.get(&job_id)
    }

    /// All jobs, newest first.
    pub fn jobs(&self) -> Vec<ReclassificationJob> {
        let mut all: Vec<ReclassificationJob> = self.jobs.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.job_id.cmp(&b.job_id)));
        all
    }

    /// True while any visible job is non-terminal (drives polling).
    pub fn has_active(&self) -> bool {
        self.jobs.values().any(|j| !j.status.is_terminal())
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// True when no jobs are tracked.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Event for an `apply` outcome, if one should be emitted.
    pub fn event_for(applied: Applied, job: &ReclassificationJob) -> Option<JobEvent> {
        match applied {
            Applied::Updated => Some(JobEvent::JobUpdated { job: job.clone() }),
            Applied::ReachedTerminal(JobStatus::Completed) => {
                debug!(job_id = %job.job_id, "Job completed");
                Some(JobEvent::JobCompleted { job_id: job.job_id })
            }
            Applied::ReachedTerminal(JobStatus::Failed) => {
                Some(JobEvent::JobFailed { job_id: job.job_id })
            }
            Applied::ReachedTerminal(JobStatus::Cancelled) => {
                Some(JobEvent::JobCancelled { job_id: job.job_id })
            }
            Applied::ReachedTerminal(_) | Applied::Stale | Applied::Unchanged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use segmenta_core::{JobProgress, JobType};

    fn job(id: Uuid, status: JobStatus) -> ReclassificationJob {
        ReclassificationJob {
            job_id: id,
            job_type: JobType::AllContacts,
            dry_run: false,
            status,
            progress: JobProgress::default(),
            created_at: Utc::now(),
            created_by: None,
            sample_changes: Vec::new(),
        }
    }

    #[test]
    fn test_apply_new_job() {
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        assert_eq!(board.apply(job(id, JobStatus::Pending)), Applied::Updated);
        assert_eq!(board.len(), 1);
        assert!(board.has_active());
    }

    #[test]
    fn test_apply_progress_update() {
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        board.apply(job(id, JobStatus::Processing));

        let mut update = job(id, JobStatus::Processing);
        update.progress.processed = 5;
        assert_eq!(board.apply(update), Applied::Updated);
        assert_eq!(board.get(id).unwrap().progress.processed, 5);
    }

    #[test]
    fn test_apply_identical_update_unchanged() {
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        let j = job(id, JobStatus::Processing);
        board.apply(j.clone());
        assert_eq!(board.apply(j), Applied::Unchanged);
    }

    #[test]
    fn test_transition_to_terminal() {
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        board.apply(job(id, JobStatus::Processing));
        assert_eq!(
            board.apply(job(id, JobStatus::Completed)),
            Applied::ReachedTerminal(JobStatus::Completed)
        );
        assert!(!board.has_active());
    }

    #[test]
    fn test_terminal_never_regresses_to_non_terminal() {
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        board.apply(job(id, JobStatus::Completed));

        assert_eq!(board.apply(job(id, JobStatus::Processing)), Applied::Stale);
        assert_eq!(board.get(id).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn test_terminal_never_switches_terminal_status() {
        // Cancel ack raced a completion: completed wins, late cancelled is stale.
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        board.apply(job(id, JobStatus::Completed));

        assert_eq!(board.apply(job(id, JobStatus::Cancelled)), Applied::Stale);
        assert_eq!(board.get(id).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn test_terminal_refreshes_final_payload() {
        let mut board = JobBoard::new();
        let id = Uuid::new_v4();
        board.apply(job(id, JobStatus::Completed));

        let mut finished = job(id, JobStatus::Completed);
        finished.progress.updated = 7;
        assert_eq!(board.apply(finished), Applied::Unchanged);
        assert_eq!(board.get(id).unwrap().progress.updated, 7);
    }

    #[test]
    fn test_has_active_with_mixed_jobs() {
        let mut board = JobBoard::new();
        board.apply(job(Uuid::new_v4(), JobStatus::Completed));
        assert!(!board.has_active());
        board.apply(job(Uuid::new_v4(), JobStatus::Pending));
        assert!(board.has_active());
    }

    #[test]
    fn test_event_for_terminal_statuses() {
        let j = job(Uuid::new_v4(), JobStatus::Completed);
        assert!(matches!(
            JobBoard::event_for(Applied::ReachedTerminal(JobStatus::Completed), &j),
            Some(JobEvent::JobCompleted { .. })
        ));
        assert!(matches!(
            JobBoard::event_for(Applied::ReachedTerminal(JobStatus::Failed), &j),
            Some(JobEvent::JobFailed { .. })
        ));
        assert!(matches!(
            JobBoard::event_for(Applied::ReachedTerminal(JobStatus::Cancelled), &j),
            Some(JobEvent::JobCancelled { .. })
        ));
        assert!(JobBoard::event_for(Applied::Stale, &j).is_none());
        assert!(JobBoard::event_for(Applied::Unchanged, &j).is_none());
    }

    #[test]
    fn test_jobs_listed_newest_first() {
        let mut board = JobBoard::new();
        let older = job(Uuid::new_v4(), JobStatus::Completed);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = job(Uuid::new_v4(), JobStatus::Pending);
        board.apply(older.clone());
        board.apply(newer.clone());

        let listed = board.jobs();
        assert_eq!(listed[0].job_id, newer.job_id);
        assert_eq!(listed[1].job_id, older.job_id);
    }
}

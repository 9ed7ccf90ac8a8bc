//! Polling monitor for reclassification jobs.
//!
//! The backend exposes no push channel, so the monitor polls the job
//! listing on a fixed interval while any watched job is non-terminal and
//! goes quiet once everything settles. The poll task is bound to a
//! [`MonitorHandle`]: shutting the handle down is guaranteed to stop the
//! timer, so no orphaned task keeps driving state after the owning view
//! goes away.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, Notify, RwLock};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use segmenta_core::{
    defaults, ClassifierApi, Error, ImpactEstimate, JobStatus, JobType, ReclassificationJob,
    Result,
};

use crate::state::{JobBoard, JobEvent};

/// Default polling interval for job status (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = defaults::JOB_POLL_INTERVAL_MS;

/// Configuration for the job monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Page size for the job listing request.
    pub page_limit: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            page_limit: defaults::JOB_PAGE_LIMIT,
        }
    }
}

impl MonitorConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `SEGMENTA_JOB_POLL_INTERVAL_MS` | `5000` | Polling interval |
    /// | `SEGMENTA_JOB_PAGE_LIMIT` | `20` | Jobs fetched per poll |
    pub fn from_env() -> Self {
        let poll_interval_ms = std::env::var("SEGMENTA_JOB_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let page_limit = std::env::var("SEGMENTA_JOB_PAGE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults::JOB_PAGE_LIMIT);

        Self {
            poll_interval_ms,
            page_limit,
        }
    }

    /// Create a new config with a custom poll interval.
    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the job listing page size.
    pub fn with_page_limit(mut self, limit: i64) -> Self {
        self.page_limit = limit;
        self
    }
}

/// Handle for controlling a running monitor.
pub struct MonitorHandle {
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<JobEvent>,
}

impl MonitorHandle {
    /// Signal the monitor to stop polling. The poll task exits at the
    /// next loop iteration; no further ticks fire.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| Error::Internal("Failed to send shutdown signal".into()))?;
        Ok(())
    }

    /// Get a receiver for job events.
    pub fn events(&self) -> broadcast::Receiver<JobEvent> {
        self.event_rx.resubscribe()
    }
}

/// Monitor over the reclassification jobs visible to the console.
#[derive(Clone)]
pub struct JobMonitor {
    api: Arc<dyn ClassifierApi>,
    config: MonitorConfig,
    board: Arc<RwLock<JobBoard>>,
    event_tx: broadcast::Sender<JobEvent>,
    wake: Arc<Notify>,
}

impl JobMonitor {
    /// Create a new monitor over a backend.
    pub fn new(api: Arc<dyn ClassifierApi>, config: MonitorConfig) -> Self {
        let (event_tx, _) = broadcast::channel(defaults::JOB_EVENT_CAPACITY);
        Self {
            api,
            config,
            board: Arc::new(RwLock::new(JobBoard::new())),
            event_tx,
            wake: Arc::new(Notify::new()),
        }
    }

    /// Get a receiver for job events.
    pub fn events(&self) -> broadcast::Receiver<JobEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the tracked jobs, newest first.
    pub async fn jobs(&self) -> Vec<ReclassificationJob> {
        self.board.read().await.jobs()
    }

    /// One tracked job, if known.
    pub async fn job(&self, job_id: Uuid) -> Option<ReclassificationJob> {
        self.board.read().await.get(job_id).cloned()
    }

    /// Create a trackable reclassification job and start watching it.
    /// Dry-run jobs are tracked identically; they just never mutate
    /// persisted contact records server-side.
    pub async fn create_job(
        &self,
        job_type: JobType,
        dry_run: bool,
    ) -> Result<ReclassificationJob> {
        let job = self.api.create_job(job_type, dry_run).await?;
        info!(job_id = %job.job_id, job_type = %job.job_type, dry_run, "Watching new reclassification job");
        self.apply_update(job.clone()).await;
        // Wake the poll loop if it idled out with all jobs terminal.
        self.wake.notify_one();
        Ok(job)
    }

    /// Dry computation of a job's reach. Does not create a job and does
    /// not touch the board.
    pub async fn estimate_impact(&self, job_type: JobType) -> Result<ImpactEstimate> {
        self.api.estimate_impact(job_type).await
    }

    /// Request cancellation of a processing job.
    ///
    /// Only legal while the job is locally known to be `processing`. The
    /// board reflects `cancelled` only after the server acknowledges —
    /// never optimistically — and a stale ack that raced a completion is
    /// reconciled by the monotonic board on the next poll.
    pub async fn cancel(&self, job_id: Uuid) -> Result<ReclassificationJob> {
        {
            let board = self.board.read().await;
            match board.get(job_id) {
                None => return Err(Error::NotFound(format!("job {job_id}"))),
                Some(job) if job.status != JobStatus::Processing => {
                    return Err(Error::Validation(format!(
                        "job {job_id} is {} and cannot be cancelled",
                        job.status
                    )));
                }
                Some(_) => {}
            }
        }

        let acked = self.api.cancel_job(job_id).await?;
        self.apply_update(acked.clone()).await;
        Ok(acked)
    }

    /// Fetch the latest job page once and reconcile the board.
    /// Poll failures are swallowed: the next tick retries, and stale
    /// local state is preferable to blocking the view.
    #[instrument(skip(self), fields(subsystem = "jobs", component = "monitor", op = "poll"))]
    pub async fn poll_once(&self) {
        match self.api.list_jobs(self.config.page_limit).await {
            Ok(jobs) => {
                debug!(result_count = jobs.len(), "Polled job listing");
                for job in jobs {
                    self.apply_update(job).await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Job poll failed; retrying on next tick");
            }
        }
    }

    async fn apply_update(&self, job: ReclassificationJob) {
        let applied = {
            let mut board = self.board.write().await;
            board.apply(job.clone())
        };
        if let Some(event) = JobBoard::event_for(applied, &job) {
            let _ = self.event_tx.send(event);
        }
    }

    /// Start the poll loop and return a handle for control.
    pub fn start(&self) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        let monitor = self.clone();
        tokio::spawn(async move {
            monitor.run(&mut shutdown_rx).await;
        });

        MonitorHandle {
            shutdown_tx,
            event_rx,
        }
    }

    /// Poll loop: fetch while any job is non-terminal, idle on the wake
    /// notify otherwise, exit on shutdown.
    async fn run(&self, shutdown_rx: &mut mpsc::Receiver<()>) {
        info!(
            poll_interval_ms = self.config.poll_interval_ms,
            "Job monitor started"
        );
        let _ = self.event_tx.send(JobEvent::MonitorStarted);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if shutdown_rx.try_recv().is_ok() {
                info!("Job monitor received shutdown signal");
                break;
            }

            if self.board.read().await.has_active() {
                self.poll_once().await;
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Job monitor received shutdown signal");
                        break;
                    }
                    _ = sleep(poll_interval) => {}
                }
            } else {
                // All visible jobs terminal — stop polling until a new
                // job is registered.
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Job monitor received shutdown signal");
                        break;
                    }
                    _ = self.wake.notified() => {}
                }
            }
        }

        let _ = self.event_tx.send(JobEvent::MonitorStopped);
        info!("Job monitor stopped");
    }
}

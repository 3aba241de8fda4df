//! Job controller: enforces the single-active-job invariant and owns the
//! worker lifecycle.
//!
//! Lifecycle:
//! ```text
//! Idle → Running → Stopping → Stopped
//!            └────────────────→ Stopped (list exhausted / pool starved)
//! ```
//! `start` checks-and-sets the status under one lock, so two concurrent
//! starts can never spawn two workers.

use crate::config::JobConfig;
use crate::error::JobError;
use crate::pool::PhonePool;
use crate::traits::PlatformClient;
use crate::worker::Worker;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Running,
    Stopping,
    Stopped,
}

/// State of one batch run. Mutated only by the owning worker and by
/// [`JobController::stop`].
pub struct AddJob {
    pub config: JobConfig,
    pub status: JobStatus,
    pub cursor: usize,
    pub session_added_total: u64,
    pub log: Vec<String>,
}

impl AddJob {
    fn new(config: JobConfig) -> Self {
        Self {
            config,
            status: JobStatus::Running,
            cursor: 0,
            session_added_total: 0,
            log: Vec::new(),
        }
    }

    /// Append a timestamped line to the job log and mirror it to tracing.
    pub(crate) fn log_line(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        info!("{}", msg);
        self.log
            .push(format!("{} - {}", Utc::now().format("%Y-%m-%d %H:%M:%S"), msg));
    }
}

/// Snapshot returned by [`JobController::status`]; safe to build while the
/// worker runs because the log is copied out under the job lock.
#[derive(Debug, Clone)]
pub struct JobStatusView {
    pub running: bool,
    pub group: String,
    pub total_added: u64,
    pub log: Vec<String>,
}

pub struct StopResult {
    pub stopped: bool,
    pub message: String,
}

struct ControllerState {
    job: Option<Arc<Mutex<AddJob>>>,
    token: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

pub struct JobController {
    pool: Arc<PhonePool>,
    platform: Arc<dyn PlatformClient>,
    state: Mutex<ControllerState>,
}

impl JobController {
    pub fn new(pool: Arc<PhonePool>, platform: Arc<dyn PlatformClient>) -> Self {
        Self {
            pool,
            platform,
            state: Mutex::new(ControllerState {
                job: None,
                token: None,
                handle: None,
            }),
        }
    }

    /// Start a new batch run. Fails if a run is active or the config is
    /// invalid; on success the worker is spawned and the previous job's
    /// state is replaced.
    pub fn start(&self, config: JobConfig) -> Result<(), JobError> {
        config.validate()?;

        let mut state = self.state.lock().unwrap();
        if let Some(job) = &state.job {
            let status = job.lock().unwrap().status;
            if matches!(status, JobStatus::Running | JobStatus::Stopping) {
                return Err(JobError::AlreadyRunning);
            }
        }

        let group = config.group_target.clone();
        let users = config.user_list.len();
        let job = Arc::new(Mutex::new(AddJob::new(config)));
        job.lock().unwrap().log_line(format!(
            "Starting add job for group '{}' with {} users.",
            group, users
        ));

        let token = CancellationToken::new();
        let worker = Worker::new(
            Arc::clone(&self.pool),
            Arc::clone(&self.platform),
            Arc::clone(&job),
            token.child_token(),
        );
        state.handle = Some(tokio::spawn(worker.run()));
        state.job = Some(job);
        state.token = Some(token);
        Ok(())
    }

    /// Request the running job to stop. The worker observes the request at
    /// its next safe point, so completion lags by at most one pacing sleep.
    pub fn stop(&self) -> StopResult {
        let state = self.state.lock().unwrap();
        let running = state.job.as_ref().is_some_and(|job| {
            let mut job = job.lock().unwrap();
            match job.status {
                JobStatus::Running => {
                    job.status = JobStatus::Stopping;
                    job.log_line("Stop requested by operator.");
                    true
                }
                JobStatus::Stopping => true,
                _ => false,
            }
        });

        if running {
            if let Some(token) = &state.token {
                token.cancel();
            }
            StopResult {
                stopped: true,
                message: "Operation stop requested.".to_string(),
            }
        } else {
            StopResult {
                stopped: false,
                message: "No add operation in progress.".to_string(),
            }
        }
    }

    /// Pure read; safe to call concurrently with the worker.
    pub fn status(&self) -> JobStatusView {
        let state = self.state.lock().unwrap();
        match &state.job {
            Some(job) => {
                let job = job.lock().unwrap();
                JobStatusView {
                    running: matches!(job.status, JobStatus::Running | JobStatus::Stopping),
                    group: job.config.group_target.clone(),
                    total_added: job.session_added_total,
                    log: job.log.clone(),
                }
            }
            None => JobStatusView {
                running: false,
                group: String::new(),
                total_added: 0,
                log: Vec::new(),
            },
        }
    }

    pub fn session_added_total(&self) -> u64 {
        self.status().total_added
    }

    /// Await the current worker task, if any. Used for graceful shutdown
    /// and by tests that need a deterministic end-of-run point.
    pub async fn join(&self) {
        let handle = self.state.lock().unwrap().handle.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

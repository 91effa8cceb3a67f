//! Job status poller.
//!
//! [`JobPoller`] is the state machine: it holds the last known status and folds
//! each fetch result into it. [`run_poller`] is the async driver: it sleeps for
//! the interval, fetches once, and repeats until the job reaches a terminal
//! state or the caller cancels.
//!
//! POLLING RULES
//! =============
//! - Terminal states (`completed`, `failed`) stop polling permanently.
//! - A fetched terminal status ends the driver with [`PollExit::Reload`]; the
//!   host then reloads the authoritative job record.
//! - A fetched non-terminal status updates the state and keeps polling.
//! - Fetch failures are logged and swallowed; the state is unchanged.
//! - The driver awaits each fetch before sleeping again, so at most one
//!   request is ever in flight.
//!
//! The driver is runtime-agnostic: the caller supplies the sleep function.

#[cfg(test)]
#[path = "poller_test.rs"]
mod poller_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::job::{FetchError, JobRecord, JobSource, JobStatus};

/// Result of folding one fetch into the poller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No request was made (already terminal), the fetch failed, or the
    /// status did not change.
    Unchanged,
    /// The job moved to another non-terminal status.
    Advanced(JobStatus),
    /// The job reached a terminal status.
    Terminal(JobStatus),
}

/// Polling state for one job.
#[derive(Debug, Clone)]
pub struct JobPoller {
    job_id: String,
    status: JobStatus,
    requests: u64,
    last_record: Option<JobRecord>,
}

impl JobPoller {
    #[must_use]
    pub fn new(job_id: impl Into<String>, initial_status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status: initial_status,
            requests: 0,
            last_record: None,
        }
    }

    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Number of fetches issued so far.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// The most recent successfully fetched record.
    #[must_use]
    pub fn last_record(&self) -> Option<&JobRecord> {
        self.last_record.as_ref()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fold a fetch result into the state.
    pub fn apply(&mut self, fetched: Result<JobRecord, FetchError>) -> PollOutcome {
        if self.is_done() {
            return PollOutcome::Unchanged;
        }
        let record = match fetched {
            Ok(record) => record,
            Err(error) => {
                warn!(job_id = %self.job_id, %error, retryable = error.retryable(), "job poll failed");
                return PollOutcome::Unchanged;
            }
        };
        let next = record.status;
        self.last_record = Some(record);
        if next == self.status {
            return PollOutcome::Unchanged;
        }
        self.status = next;
        if next.is_terminal() {
            info!(job_id = %self.job_id, status = %next, "job finished");
            PollOutcome::Terminal(next)
        } else {
            debug!(job_id = %self.job_id, status = %next, "job advanced");
            PollOutcome::Advanced(next)
        }
    }

    /// Fetch once and fold the result. Issues no request once terminal.
    pub async fn poll_once<S>(&mut self, source: &S) -> PollOutcome
    where
        S: JobSource + ?Sized,
    {
        if self.is_done() {
            return PollOutcome::Unchanged;
        }
        self.requests += 1;
        let fetched = source.fetch_job(&self.job_id).await;
        self.apply(fetched)
    }
}

/// Cancellation handle shared between the driver and the view that owns it.
#[derive(Debug, Clone, Default)]
pub struct PollHandle {
    cancelled: Arc<AtomicBool>,
}

impl PollHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the driver at its next checkpoint. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Why [`run_poller`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The initial status was already terminal; nothing was fetched.
    AlreadyTerminal(JobStatus),
    /// A terminal status was fetched; the host should reload the job.
    Reload(JobStatus),
    /// The handle was cancelled.
    Cancelled,
}

/// Poll `source` every `interval` until the job is terminal or `handle` is
/// cancelled. `sleep` produces the timer future for one interval.
pub async fn run_poller<S, F, Fut>(
    poller: &mut JobPoller,
    source: &S,
    interval: Duration,
    handle: &PollHandle,
    mut sleep: F,
) -> PollExit
where
    S: JobSource + ?Sized,
    F: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    if poller.is_done() {
        return PollExit::AlreadyTerminal(poller.status());
    }
    loop {
        sleep(interval).await;
        if handle.is_cancelled() {
            debug!(job_id = %poller.job_id(), "poller cancelled");
            return PollExit::Cancelled;
        }
        if let PollOutcome::Terminal(status) = poller.poll_once(source).await {
            return PollExit::Reload(status);
        }
        if handle.is_cancelled() {
            debug!(job_id = %poller.job_id(), "poller cancelled");
            return PollExit::Cancelled;
        }
    }
}

// =============================================================
// Progress indicator
// =============================================================

/// The "Analyzing..." indicator: cycles `""`, `"."`, `".."`, `"..."`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressDots {
    count: u8,
}

impl ProgressDots {
    const FRAMES: [&'static str; 4] = ["", ".", "..", "..."];

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(self) -> &'static str {
        Self::FRAMES[usize::from(self.count % 4)]
    }

    /// Advance one frame and return the new dots.
    pub fn advance(&mut self) -> &'static str {
        self.count = (self.count + 1) % 4;
        self.current()
    }

    /// Full status line, e.g. `"Analyzing Space.."`.
    #[must_use]
    pub fn label(self) -> String {
        format!("Analyzing Space{}", self.current())
    }
}

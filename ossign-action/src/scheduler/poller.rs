//! Workflow poller
//!
//! Checks one workflow on a fixed interval. Exactly one check call is in
//! flight at a time; waiting between checks yields to the runtime.

use std::time::Duration;

use ossign_client::{WorkflowApi, WorkflowStatus};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::error::{Phase, RunError};

/// States of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Started, first interval not yet elapsed
    Waiting,
    /// At least one check issued, workflow not completed
    Polling,
    /// Workflow reported completion
    Done,
    /// Deadline passed without completion
    TimedOut,
}

/// Bounded retry of transient check failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries per check before the failure ends the run; 0 disables retrying
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Timing parameters for the poll loop
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Result of a finished poll loop
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Either [`PollState::Done`] or [`PollState::TimedOut`]
    pub state: PollState,
    /// Last snapshot observed
    pub snapshot: WorkflowStatus,
    /// Number of successful check iterations
    pub checks: usize,
    /// Distinct status labels in the order they were observed
    pub statuses: Vec<String>,
}

impl PollOutcome {
    pub fn is_done(&self) -> bool {
        self.state == PollState::Done
    }
}

/// Polls one workflow until it completes or the deadline passes
pub struct WorkflowPoller<'a> {
    api: &'a dyn WorkflowApi,
    account: &'a str,
    settings: PollSettings,
}

impl<'a> WorkflowPoller<'a> {
    /// Creates a new poller
    pub fn new(api: &'a dyn WorkflowApi, account: &'a str, settings: PollSettings) -> Self {
        Self {
            api,
            account,
            settings,
        }
    }

    /// Runs the poll loop for `job_id`.
    ///
    /// The deadline is checked before each sleep, so the loop never starts a
    /// wait once the timeout has elapsed. Non-transient check failures end
    /// the loop with an error.
    pub async fn poll_until_done(&self, job_id: &str) -> Result<PollOutcome, RunError> {
        info!(
            "Waiting for workflow {} to complete (interval: {:?}, timeout: {:?})",
            job_id, self.settings.interval, self.settings.timeout
        );

        let started = Instant::now();
        let mut state = PollState::Waiting;
        let mut snapshot = WorkflowStatus {
            id: job_id.to_string(),
            ..Default::default()
        };
        let mut checks = 0;
        let mut statuses = Vec::new();

        loop {
            if started.elapsed() >= self.settings.timeout {
                state = PollState::TimedOut;
                break;
            }

            time::sleep(self.settings.interval).await;

            if state == PollState::Waiting {
                debug!("Poll loop for {} entering polling state", job_id);
                state = PollState::Polling;
            }

            let latest = self.check_with_retry(job_id, started).await?;
            checks += 1;

            if latest.last_status != snapshot.last_status {
                info!("Status is now: {}", latest.status_label());
                statuses.push(latest.status_label().to_string());
            } else {
                debug!("Status unchanged: {}", latest.status_label());
            }

            snapshot = latest;

            if snapshot.is_completed() {
                state = PollState::Done;
                break;
            }
        }

        match state {
            PollState::Done => info!("Workflow {} completed after {} check(s)", job_id, checks),
            _ => warn!(
                "Workflow {} did not complete within {:?} ({} check(s))",
                job_id, self.settings.timeout, checks
            ),
        }

        Ok(PollOutcome {
            state,
            snapshot,
            checks,
            statuses,
        })
    }

    /// Performs one check, retrying transient failures with exponential backoff
    async fn check_with_retry(
        &self,
        job_id: &str,
        started: Instant,
    ) -> Result<WorkflowStatus, RunError> {
        let policy = &self.settings.retry;
        let mut attempt = 0;
        let mut delay = policy.initial_delay;

        loop {
            info!("Checking workflow status for ID {}...", job_id);

            match self.api.check(self.account, job_id).await {
                Ok(status) => return Ok(status),
                Err(e) if e.is_transient() && attempt < policy.max_retries => {
                    if started.elapsed() + delay >= self.settings.timeout {
                        warn!("Not retrying status check: deadline would pass during backoff");
                        return Err(RunError::remote(Phase::Check)(e));
                    }

                    attempt += 1;
                    warn!(
                        "Status check failed (attempt {}/{}): {}",
                        attempt, policy.max_retries, e
                    );
                    warn!("Retrying in {:?}...", delay);

                    time::sleep(delay).await;

                    delay = (delay * 2).min(policy.max_delay);
                }
                Err(e) => return Err(RunError::remote(Phase::Check)(e)),
            }
        }
    }
}

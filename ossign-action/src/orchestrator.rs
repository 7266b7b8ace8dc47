//! Run orchestration
//!
//! Picks one of the three run modes and drives dispatch and polling. Every
//! fatal error short-circuits the run; nothing executes past it.

use std::sync::Arc;

use ossign_client::{ReleaseAsset, WorkflowApi, WorkflowStatus};
use tracing::{debug, info};

use crate::config::{Config, RunMode};
use crate::error::{Phase, RunError};
use crate::outputs::RunReport;
use crate::scheduler::{PollSettings, WorkflowPoller};
use crate::service::dispatch_workflow;

/// Drives one action run against the signing service
pub struct Orchestrator {
    api: Arc<dyn WorkflowApi>,
    config: Config,
}

impl Orchestrator {
    pub fn new(api: Arc<dyn WorkflowApi>, config: Config) -> Self {
        Self { api, config }
    }

    /// Validates inputs, then runs the configured mode
    pub async fn run(&self) -> Result<RunReport, RunError> {
        self.config.validate()?;

        match self.config.mode() {
            RunMode::SingleCheck(job_id) => self.single_check(&job_id).await,
            RunMode::DispatchOnly => self.dispatch_only().await,
            RunMode::Full => self.dispatch_and_wait().await,
        }
    }

    /// One status check, no polling. An unfinished workflow is not an error.
    async fn single_check(&self, job_id: &str) -> Result<RunReport, RunError> {
        info!(
            "Single check mode enabled, checking status of workflow ID {}...",
            job_id
        );

        let status = self
            .api
            .check(self.config.account(), job_id)
            .await
            .map_err(RunError::remote(Phase::Check))?;

        let workflow_id = Some(status.job_id().unwrap_or(job_id).to_string());

        match status.signed_assets() {
            Some(assets) => Ok(finished_report(workflow_id, assets)),
            None => {
                info!(
                    "Workflow not completed yet (status: {}).",
                    display_status(&status)
                );
                Ok(RunReport {
                    finished: false,
                    workflow_id,
                    signed_artifacts: None,
                })
            }
        }
    }

    async fn dispatch_only(&self) -> Result<RunReport, RunError> {
        let status = self.dispatch().await?;

        info!("Dispatch only mode enabled, exiting after dispatch.");

        Ok(RunReport {
            finished: false,
            workflow_id: status.job_id().map(str::to_string),
            signed_artifacts: None,
        })
    }

    async fn dispatch_and_wait(&self) -> Result<RunReport, RunError> {
        let dispatched = self.dispatch().await?;
        let job_id = dispatched.job_id().unwrap_or_default().to_string();

        let poller = WorkflowPoller::new(
            self.api.as_ref(),
            self.config.account(),
            PollSettings {
                interval: self.config.poll_interval,
                timeout: self.config.timeout,
                retry: self.config.retry.clone(),
            },
        );

        let outcome = poller.poll_until_done(&job_id).await?;
        debug!(
            "Workflow {} status history over {} check(s): {}",
            job_id,
            outcome.checks,
            outcome.statuses.join(" -> ")
        );

        if !outcome.is_done() {
            return Err(RunError::Timeout {
                job_id,
                timeout: self.config.timeout,
                last_status: outcome.snapshot.last_status,
            });
        }

        let assets = outcome.snapshot.signed_assets().unwrap_or_default();
        Ok(finished_report(Some(job_id), assets))
    }

    async fn dispatch(&self) -> Result<WorkflowStatus, RunError> {
        info!("Dispatching new workflow...");

        dispatch_workflow(
            self.api.as_ref(),
            self.config.account(),
            self.config.git_ref.as_deref(),
            self.config.repository.as_deref(),
        )
        .await
    }
}

fn finished_report(workflow_id: Option<String>, assets: &[ReleaseAsset]) -> RunReport {
    info!("Workflow completed successfully.");

    if assets.is_empty() {
        info!("No signed artifacts found.");
    } else {
        info!("Signed artifacts:");
        for asset in assets {
            info!("- {}: {}", asset.name, asset.browser_download_url);
        }
    }

    RunReport {
        finished: true,
        workflow_id,
        signed_artifacts: Some(assets.to_vec()),
    }
}

fn display_status(status: &WorkflowStatus) -> &str {
    match status.status_label() {
        "" => "unknown",
        label => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::MemoryOutputs;
    use crate::testing::{FakeApi, completed, dispatched, running};
    use ossign_client::ClientError;
    use std::time::Duration;

    fn config() -> Config {
        let mut config = Config::new("acme", "t1");
        config.git_ref = Some("refs/heads/main".to_string());
        config
    }

    fn orchestrator(api: &Arc<FakeApi>, config: Config) -> Orchestrator {
        Orchestrator::new(api.clone(), config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_mode_waits_for_completion() {
        let done = WorkflowStatus {
            id: "wf-1".into(),
            last_status: Some("completed".into()),
            completed: Some(true),
            release_assets: Some(vec![ReleaseAsset {
                id: "a1".into(),
                name: "pkg.exe".into(),
                url: "https://api.example.test/assets/a1".into(),
                browser_download_url: "https://downloads.example.test/pkg.exe".into(),
            }]),
            ..Default::default()
        };
        let api = Arc::new(
            FakeApi::new()
                .on_dispatch(Ok(dispatched("wf-1")))
                .on_check(Ok(running("wf-1", "queued")))
                .on_check(Ok(running("wf-1", "signing")))
                .on_check(Ok(done.clone())),
        );

        let report = orchestrator(&api, config()).run().await.unwrap();

        assert!(report.finished);
        assert_eq!(report.workflow_id.as_deref(), Some("wf-1"));
        assert_eq!(report.signed_artifacts, done.release_assets);
        assert_eq!(api.dispatches().len(), 1);
        assert_eq!(api.dispatches()[0].1.source_branch, "main");
        assert!(api.dispatches()[0].1.release_name.starts_with("Ref: main - "));
        assert_eq!(api.check_calls().len(), 3);

        let mut outputs = MemoryOutputs::default();
        report.write_to(&mut outputs).unwrap();
        let artifacts: serde_json::Value =
            serde_json::from_str(&outputs.0["signed_artifacts"]).unwrap();
        assert_eq!(artifacts[0]["name"], "pkg.exe");
        assert_eq!(
            artifacts[0]["browser_download_url"],
            "https://downloads.example.test/pkg.exe"
        );
        assert_eq!(outputs.0["finished"], "true");
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_mode_times_out() {
        let api = Arc::new(
            FakeApi::new()
                .on_dispatch(Ok(dispatched("wf-1")))
                .repeat_check(running("wf-1", "signing")),
        );
        let mut config = config();
        config.timeout = Duration::from_secs(120);

        let err = orchestrator(&api, config).run().await.unwrap_err();

        assert!(matches!(err, RunError::Timeout { ref job_id, .. } if job_id == "wf-1"));
        assert!(err.to_string().contains("did not complete within the timeout period"));
        assert_eq!(api.check_calls().len(), 8);
    }

    #[tokio::test]
    async fn test_dispatch_only_mode() {
        let api = Arc::new(FakeApi::new().on_dispatch(Ok(dispatched("wf-9"))));
        let mut config = config();
        config.dispatch_only = true;

        let report = orchestrator(&api, config).run().await.unwrap();

        assert_eq!(
            report,
            RunReport {
                finished: false,
                workflow_id: Some("wf-9".into()),
                signed_artifacts: None,
            }
        );
        assert_eq!(api.dispatches().len(), 1);
        assert!(api.check_calls().is_empty());

        let mut outputs = MemoryOutputs::default();
        report.write_to(&mut outputs).unwrap();
        assert_eq!(outputs.0["workflow_id"], "wf-9");
        assert_eq!(outputs.0["signed_artifacts"], "");
        assert_eq!(outputs.0["finished"], "false");
    }

    #[tokio::test]
    async fn test_single_check_in_progress_is_not_an_error() {
        let api = Arc::new(FakeApi::new().on_check(Ok(running("wf-3", "signing"))));
        let mut config = config();
        config.single_check = Some("wf-3".into());
        config.dispatch_only = true;

        let report = orchestrator(&api, config).run().await.unwrap();

        assert!(!report.finished);
        assert_eq!(report.signed_artifacts, None);
        assert_eq!(api.check_calls(), vec!["acme/wf-3"]);
        assert!(api.dispatches().is_empty());
    }

    #[tokio::test]
    async fn test_single_check_completed_reports_assets() {
        let api = Arc::new(FakeApi::new().repeat_check(completed("wf-3", 2)));
        let mut config = config();
        config.single_check = Some("wf-3".into());

        let first = orchestrator(&api, config.clone()).run().await.unwrap();
        let second = orchestrator(&api, config).run().await.unwrap();

        assert!(first.finished);
        assert_eq!(first.signed_artifacts.as_ref().map(Vec::len), Some(2));
        assert_eq!(first, second);
        assert_eq!(api.check_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_single_check_failure_is_an_error() {
        let api = Arc::new(FakeApi::new().on_check(Err(ClientError::api_error(
            404,
            "Not Found",
            "no such workflow",
        ))));
        let mut config = config();
        config.single_check = Some("wf-404".into());

        let err = orchestrator(&api, config).run().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to check workflow status: 404 Not Found - no such workflow"
        );
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_calls() {
        let api = Arc::new(FakeApi::new().on_dispatch(Ok(dispatched("wf-1"))));
        let mut config = config();
        config.token = String::new();

        let err = orchestrator(&api, config).run().await.unwrap_err();

        assert!(matches!(err, RunError::Config(_)));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_failure_stops_the_run() {
        let api = Arc::new(
            FakeApi::new()
                .on_dispatch(Err(ClientError::Remote {
                    message: "quota exceeded".into(),
                }))
                .repeat_check(completed("wf-1", 1)),
        );

        let err = orchestrator(&api, config()).run().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to dispatch workflow: quota exceeded");
        assert!(api.check_calls().is_empty());
    }
}

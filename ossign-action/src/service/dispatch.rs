//! Dispatch service
//!
//! Turns the triggering ref into a dispatch request and starts a workflow.

use chrono::Utc;
use ossign_client::{WorkflowApi, WorkflowStatus};
use ossign_core::dto::dispatch::DispatchRequest;
use ossign_core::git_ref::resolve_ref_name;
use tracing::info;

use crate::config::non_blank;
use crate::error::{Phase, RunError};

/// Starts a signing workflow for `git_ref` under `account`.
///
/// # Arguments
/// * `api` - Signing service
/// * `account` - Account the workflow runs under
/// * `git_ref` - Triggering ref; `refs/heads/` or `refs/tags/` is stripped
/// * `repository` - Repository name, only used for logging
///
/// # Returns
/// The dispatch snapshot, guaranteed to carry a job id
pub async fn dispatch_workflow(
    api: &dyn WorkflowApi,
    account: &str,
    git_ref: Option<&str>,
    repository: Option<&str>,
) -> Result<WorkflowStatus, RunError> {
    let git_ref = non_blank(git_ref)
        .ok_or_else(|| RunError::RefResolution("no triggering ref (GITHUB_REF) provided".into()))?;

    let ref_name = resolve_ref_name(git_ref);
    if ref_name.is_empty() {
        return Err(RunError::RefResolution(format!(
            "ref '{}' has an empty name",
            git_ref
        )));
    }

    info!("Starting build for {}", ref_name);
    match repository {
        Some(repo) => info!("Triggering workflow dispatch for {} in {}...", ref_name, repo),
        None => info!("Triggering workflow dispatch for {}...", ref_name),
    }

    let request = DispatchRequest::new(ref_name, Utc::now());

    let status = api
        .dispatch(account, &request)
        .await
        .map_err(RunError::remote(Phase::Dispatch))?;

    let Some(job_id) = status.job_id() else {
        return Err(RunError::Protocol {
            phase: Phase::Dispatch,
            message: "response did not include a workflow id".into(),
        });
    };

    match status.run_id {
        Some(run_id) => info!(
            "Workflow dispatch triggered successfully. Workflow ID: {}, Run ID: {}",
            job_id, run_id
        ),
        None => info!("Workflow dispatch triggered successfully. Workflow ID: {}", job_id),
    }

    Ok(status)
}

//! Workflow domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time status of one workflow run on the signing service.
///
/// Returned by both dispatch and check calls. The `id` is assigned by the
/// service and is never generated locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(
        rename = "workflow_run_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub run_id: Option<u64>,
    #[serde(
        rename = "last_checked",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_assets: Option<Vec<ReleaseAsset>>,
}

/// A downloadable artifact produced by a completed workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: String,
    pub name: String,
    pub url: String,
    pub browser_download_url: String,
}

impl WorkflowStatus {
    /// Returns the job id exactly as assigned, or `None` when it is blank
    pub fn job_id(&self) -> Option<&str> {
        if self.id.trim().is_empty() {
            None
        } else {
            Some(&self.id)
        }
    }

    /// Whether the run reached its terminal state. Absence counts as `false`.
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    /// Status label, empty when the service has not reported one
    pub fn status_label(&self) -> &str {
        self.last_status.as_deref().unwrap_or("")
    }

    /// Release assets of a completed run.
    ///
    /// Asset data on an in-progress snapshot is not trusted, so this returns
    /// `None` until the run is completed.
    pub fn signed_assets(&self) -> Option<&[ReleaseAsset]> {
        if !self.is_completed() {
            return None;
        }
        Some(self.release_assets.as_deref().unwrap_or(&[]))
    }
}

//! Dispatch DTOs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Request to start a new signing workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub source_branch: String,
    pub release_name: String,
}

impl DispatchRequest {
    /// Builds a request for `ref_name`, labelled with the dispatch time
    pub fn new(ref_name: &str, dispatched_at: DateTime<Utc>) -> Self {
        Self {
            source_branch: ref_name.to_string(),
            release_name: release_name(ref_name, dispatched_at),
        }
    }
}

/// Human label used on the service side to trace a release back to its ref
pub fn release_name(ref_name: &str, dispatched_at: DateTime<Utc>) -> String {
    format!(
        "Ref: {} - {}",
        ref_name,
        dispatched_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

//! Run-level errors
//!
//! Every failure of a run ends up as one of these, rendered as a single
//! human-readable line for the CI log.

use std::fmt;
use std::time::Duration;

use ossign_client::ClientError;
use thiserror::Error;

/// Which remote phase produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Dispatch,
    Check,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch => f.write_str("Failed to dispatch workflow"),
            Self::Check => f.write_str("Failed to check workflow status"),
        }
    }
}

/// Errors that end a run
#[derive(Debug, Error)]
pub enum RunError {
    /// A required input is missing or invalid
    #[error("{0}")]
    Config(String),

    /// The triggering ref could not be determined
    #[error("Error retrieving ref name: {0}")]
    RefResolution(String),

    /// The signing service call failed
    #[error("{phase}: {source}")]
    Remote { phase: Phase, source: ClientError },

    /// The signing service answered without a field it must provide
    #[error("{phase}: {message}")]
    Protocol { phase: Phase, message: String },

    /// The workflow never reported completion before the deadline
    #[error(
        "Workflow {job_id} did not complete within the timeout period ({}s, last status: {})",
        .timeout.as_secs(),
        .last_status.as_deref().unwrap_or("unknown")
    )]
    Timeout {
        job_id: String,
        timeout: Duration,
        last_status: Option<String>,
    },
}

impl RunError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn remote(phase: Phase) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Remote { phase, source }
    }
}

//! Remote operation selectors

use std::fmt;
use std::str::FromStr;

/// Path shape used for status checks.
///
/// The service accepts both `check/...` and `status/...` as the same operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckRoute {
    #[default]
    Check,
    Status,
}

impl CheckRoute {
    fn segment(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Status => "status",
        }
    }
}

impl FromStr for CheckRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check" => Ok(Self::Check),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "unknown check route '{}', expected 'check' or 'status'",
                other
            )),
        }
    }
}

/// One of the two remote endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Start a workflow for an account
    Dispatch { account: String },
    /// Query the status of a workflow
    Check {
        account: String,
        job_id: String,
        route: CheckRoute,
    },
}

impl Operation {
    /// Unencoded path segments relative to the API base URL
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Dispatch { account } => vec!["dispatch", account],
            Self::Check {
                account,
                job_id,
                route,
            } => vec![route.segment(), account, job_id],
        }
    }

    /// Path relative to the API base URL, as shown in logs
    pub fn path(&self) -> String {
        match self {
            Self::Dispatch { account } => format!("dispatch/{}", account),
            Self::Check {
                account,
                job_id,
                route,
            } => format!("{}/{}/{}", route.segment(), account, job_id),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

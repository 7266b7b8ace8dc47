//! OSSign HTTP Client
//!
//! A small, type-safe client for the OSSign signing service API.
//!
//! The service exposes two operations: `dispatch` starts a signing workflow
//! for an account, `check` reports the status of a workflow. Both answer with
//! a [`WorkflowStatus`] snapshot or an error envelope, which this crate turns
//! into a [`ClientError`].
//!
//! # Example
//!
//! ```no_run
//! use ossign_client::{SigningClient, WorkflowApi};
//! use ossign_core::dto::dispatch::DispatchRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SigningClient::new("https://api.ossign.org/api/v1", "secret-token")?;
//!
//!     let request = DispatchRequest::new("main", chrono::Utc::now());
//!     let workflow = client.dispatch("acme", &request).await?;
//!
//!     println!("Dispatched workflow: {}", workflow.id);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod operation;
pub mod response;
mod workflows;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use operation::{CheckRoute, Operation};
pub use ossign_core::domain::workflow::{ReleaseAsset, WorkflowStatus};
pub use response::ApiResponse;

use async_trait::async_trait;
use ossign_core::dto::dispatch::DispatchRequest;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Default base URL of the public signing service
pub const DEFAULT_BASE_URL: &str = "https://api.ossign.org/api/v1";

/// Default per-call timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The two remote operations the action relies on.
///
/// Implemented by [`SigningClient`] over HTTP; tests substitute scripted fakes.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Starts a new workflow for `account`
    async fn dispatch(&self, account: &str, request: &DispatchRequest) -> Result<WorkflowStatus>;

    /// Fetches the current status of workflow `job_id`
    async fn check(&self, account: &str, job_id: &str) -> Result<WorkflowStatus>;
}

/// HTTP client for the signing service API
///
/// Every request carries the bearer token given at construction.
#[derive(Clone)]
pub struct SigningClient {
    /// Base URL of the API (e.g., "https://api.ossign.org/api/v1")
    base_url: String,
    /// Bearer credential
    token: String,
    /// Path shape used for status checks
    check_route: CheckRoute,
    /// HTTP client instance
    client: Client,
}

impl SigningClient {
    /// Create a new client with the default 60 second per-call timeout
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API
    /// * `token` - Bearer token sent with every request
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a new client with a custom per-call timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ossign-action/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, token, client))
    }

    /// Create a new client around a configured reqwest Client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            check_route: CheckRoute::default(),
            client,
        }
    }

    /// Selects the path shape used for status checks
    pub fn with_check_route(mut self, route: CheckRoute) -> Self {
        self.check_route = route;
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured check route
    pub fn check_route(&self) -> CheckRoute {
        self.check_route
    }
}

impl fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("check_route", &self.check_route)
            .finish()
    }
}

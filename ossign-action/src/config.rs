//! Action configuration
//!
//! Inputs arrive either as command-line flags or through the environment
//! variables the CI host sets for action inputs (`INPUT_<NAME>`). Required
//! inputs are not enforced by clap: they are checked in [`Config::validate`]
//! so a missing credential is reported as a configuration error.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use ossign_client::{CheckRoute, DEFAULT_BASE_URL};

use crate::error::RunError;
use crate::scheduler::RetryPolicy;

/// Command-line and environment inputs
///
/// The CI host passes unset inputs as empty strings, so every value is taken
/// as text here and blank values fall back to their defaults in
/// [`Config::try_from`].
#[derive(Debug, Parser)]
#[command(name = "ossign-action")]
#[command(about = "Dispatch an OSSign signing workflow and wait for its artifacts", long_about = None)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Account the workflow runs under
    #[arg(long, env = "INPUT_USERNAME")]
    pub username: Option<String>,

    /// Bearer token for the signing service
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Dispatch the workflow and exit without waiting ("true" enables)
    #[arg(long, env = "INPUT_DISPATCH_ONLY", default_value = "false")]
    pub dispatch_only: String,

    /// Check an existing workflow once instead of dispatching
    #[arg(long, env = "INPUT_SINGLE_CHECK")]
    pub single_check: Option<String>,

    /// Triggering ref (refs/heads/<name> or refs/tags/<name>)
    #[arg(long, env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Repository being built, for log messages
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Signing service API base URL
    #[arg(long, env = "OSSIGN_API_URL")]
    pub api_url: Option<String>,

    /// Path shape for status checks: check or status
    #[arg(long, env = "OSSIGN_CHECK_ROUTE")]
    pub check_route: Option<String>,

    /// Seconds between status checks [default: 15]
    #[arg(long, env = "OSSIGN_POLL_INTERVAL")]
    pub poll_interval: Option<String>,

    /// Seconds to wait for the workflow before failing [default: 86400]
    #[arg(long, env = "OSSIGN_TIMEOUT")]
    pub timeout: Option<String>,

    /// Per-request timeout in seconds [default: 60]
    #[arg(long, env = "OSSIGN_REQUEST_TIMEOUT")]
    pub request_timeout: Option<String>,

    /// Retries of a timed-out or unreachable status check before giving up [default: 5]
    #[arg(long, env = "OSSIGN_MAX_TRANSIENT_RETRIES")]
    pub max_transient_retries: Option<String>,

    /// File that receives step outputs; stdout when unset
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<String>,
}

/// Which of the three run modes applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Check one existing workflow, no dispatch, no polling
    SingleCheck(String),
    /// Dispatch and report the workflow id without waiting
    DispatchOnly,
    /// Dispatch, then poll until completion or timeout
    Full,
}

/// Action configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub token: String,
    pub dispatch_only: bool,
    pub single_check: Option<String>,
    pub git_ref: Option<String>,
    pub repository: Option<String>,
    pub api_url: String,
    pub check_route: CheckRoute,
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub output_file: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration with defaults for everything but credentials
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            dispatch_only: false,
            single_check: None,
            git_ref: None,
            repository: None,
            api_url: DEFAULT_BASE_URL.to_string(),
            check_route: CheckRoute::default(),
            poll_interval: Duration::from_secs(15),
            timeout: Duration::from_secs(60 * 60 * 24),
            request_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            output_file: None,
        }
    }

    /// Selects the run mode. A single-check id wins over dispatch-only.
    pub fn mode(&self) -> RunMode {
        match non_blank(self.single_check.as_deref()) {
            Some(id) => RunMode::SingleCheck(id.to_string()),
            None if self.dispatch_only => RunMode::DispatchOnly,
            None => RunMode::Full,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), RunError> {
        if self.username.trim().is_empty() {
            return Err(RunError::config("Username is required"));
        }

        if self.token.trim().is_empty() {
            return Err(RunError::config("Token is required"));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(RunError::config("api_url must start with http:// or https://"));
        }

        if self.poll_interval.is_zero() {
            return Err(RunError::config("poll_interval must be greater than 0"));
        }

        if self.timeout.is_zero() {
            return Err(RunError::config("timeout must be greater than 0"));
        }

        if self.request_timeout.is_zero() {
            return Err(RunError::config("request_timeout must be greater than 0"));
        }

        Ok(())
    }

    /// Account name with surrounding whitespace removed
    pub fn account(&self) -> &str {
        self.username.trim()
    }
}

impl TryFrom<Cli> for Config {
    type Error = RunError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut config = Self::new(
            cli.username.unwrap_or_default(),
            cli.token.unwrap_or_default(),
        );

        config.dispatch_only = cli.dispatch_only.trim().eq_ignore_ascii_case("true");
        config.single_check = cli.single_check;
        config.git_ref = cli.git_ref;
        config.repository = non_blank(cli.repository.as_deref()).map(str::to_string);

        if let Some(url) = non_blank(cli.api_url.as_deref()) {
            config.api_url = url.to_string();
        }

        if let Some(route) = non_blank(cli.check_route.as_deref()) {
            config.check_route = route
                .parse::<CheckRoute>()
                .map_err(|e| RunError::config(format!("Invalid check_route: {}", e)))?;
        }

        config.poll_interval = seconds("poll_interval", &cli.poll_interval, config.poll_interval)?;
        config.timeout = seconds("timeout", &cli.timeout, config.timeout)?;
        config.request_timeout =
            seconds("request_timeout", &cli.request_timeout, config.request_timeout)?;
        config.retry.max_retries = number(
            "max_transient_retries",
            &cli.max_transient_retries,
            config.retry.max_retries,
        )?;
        config.output_file = non_blank(cli.output_file.as_deref()).map(PathBuf::from);

        Ok(config)
    }
}

/// Parses a numeric input; a blank or missing value keeps `default`
fn number<T: FromStr>(name: &str, raw: &Option<String>, default: T) -> Result<T, RunError> {
    match non_blank(raw.as_deref()) {
        Some(value) => value.parse().map_err(|_| {
            RunError::config(format!("Invalid {}: '{}' is not a number", name, value))
        }),
        None => Ok(default),
    }
}

fn seconds(name: &str, raw: &Option<String>, default: Duration) -> Result<Duration, RunError> {
    number(name, raw, default.as_secs()).map(Duration::from_secs)
}

/// Treats blank CI inputs as absent
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

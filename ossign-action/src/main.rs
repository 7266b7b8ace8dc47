//! OSSign Action
//!
//! A CI step that asks the OSSign signing service to sign the artifacts of
//! the triggering ref, then waits for the signing workflow to finish.
//!
//! Architecture:
//! - Configuration: inputs from flags or the CI host's `INPUT_*` variables
//! - Services: building and sending the dispatch request
//! - Scheduler: polling the workflow until completion or timeout
//! - Orchestrator: selecting the run mode and producing the step outputs
//!
//! Three modes are supported: dispatch and wait (default), dispatch only,
//! and a single status check of an existing workflow.

mod config;
mod error;
mod orchestrator;
mod outputs;
mod scheduler;
mod service;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, Config};
use crate::error::RunError;
use crate::orchestrator::Orchestrator;
use crate::outputs::{HostOutputs, report_failure};
use ossign_client::SigningClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Step debug logging on the CI host raises the default level
    let default_filter = if std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1") {
        "ossign_action=debug,ossign_client=debug"
    } else {
        "ossign_action=info,ossign_client=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::try_from(Cli::parse()) {
        Ok(config) => config,
        Err(e) => return fail(e),
    };
    info!("Starting OSSign action against {}", config.api_url);

    let mut outputs = HostOutputs::new(config.output_file.clone());

    let client = SigningClient::with_timeout(
        config.api_url.clone(),
        config.token.clone(),
        config.request_timeout,
    )?
    .with_check_route(config.check_route);

    let orchestrator = Orchestrator::new(Arc::new(client), config);

    match orchestrator.run().await {
        Ok(report) => {
            report.write_to(&mut outputs)?;
            Ok(())
        }
        Err(e) => fail(e),
    }
}

/// Reports a failed run to the CI host
fn fail(e: RunError) -> Result<()> {
    error!("{}", e);
    report_failure(&e.to_string());
    Err(e.into())
}

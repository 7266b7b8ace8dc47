//! Step outputs and failure annotations for the CI host
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` as `name=value`
//! lines, or printed to stdout when no file is configured.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ossign_client::ReleaseAsset;
use tracing::debug;

/// Destination for named step outputs
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Outputs for the CI host
#[derive(Debug, Clone, Default)]
pub struct HostOutputs {
    path: Option<PathBuf>,
}

impl HostOutputs {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl OutputSink for HostOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let entry = format_output(name, value);

        let Some(path) = &self.path else {
            print!("{}", entry);
            return Ok(());
        };

        debug!("Writing output {} to {}", name, path.display());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open output file {}", path.display()))?;

        file.write_all(entry.as_bytes())
            .with_context(|| format!("Failed to write output {}", name))
    }
}

/// Formats one output entry. Multi-line values use the heredoc form.
fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

/// Values a run reports back to the CI host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub finished: bool,
    pub workflow_id: Option<String>,
    /// `Some` only when the workflow finished
    pub signed_artifacts: Option<Vec<ReleaseAsset>>,
}

impl RunReport {
    /// Writes `signed_artifacts`, `workflow_id` (when known) and `finished`
    pub fn write_to(&self, sink: &mut dyn OutputSink) -> Result<()> {
        let artifacts = match &self.signed_artifacts {
            Some(assets) => {
                serde_json::to_string(assets).context("Failed to encode signed artifacts")?
            }
            None => String::new(),
        };

        sink.set_output("signed_artifacts", &artifacts)?;
        if let Some(id) = &self.workflow_id {
            sink.set_output("workflow_id", id)?;
        }
        sink.set_output("finished", if self.finished { "true" } else { "false" })
    }
}

/// Marks the step as failed with an `::error::` workflow command
pub fn report_failure(message: &str) {
    println!("::error::{}", escape_command_data(message));
}

fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

//! Response envelope handling
//!
//! The signing service answers some failures with a success status and a
//! `{ "message": ... }` body. Responses are classified here so callers never
//! inspect raw optional fields to decide whether a call succeeded.

use ossign_core::domain::workflow::WorkflowStatus;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// A parsed response body from the signing service
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// A workflow status snapshot
    Status(WorkflowStatus),
    /// The service's error envelope
    Error { message: String },
}

impl ApiResponse {
    /// Parses a raw response body
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        Self::from_value(value)
    }

    /// Classifies an already-decoded JSON body.
    ///
    /// Any object carrying a `message` field is an error envelope, whatever
    /// else it contains.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(message) = value.get("message") {
            let message = match message {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Ok(Self::Error { message });
        }

        serde_json::from_value(value)
            .map(Self::Status)
            .map_err(|e| ClientError::ParseError(format!("Unexpected response shape: {}", e)))
    }

    /// Converts the envelope into the snapshot or a [`ClientError::Remote`]
    pub fn into_result(self) -> Result<WorkflowStatus> {
        match self {
            Self::Status(status) => Ok(status),
            Self::Error { message } => Err(ClientError::Remote { message }),
        }
    }
}

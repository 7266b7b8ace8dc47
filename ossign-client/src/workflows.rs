//! Workflow API endpoints

use async_trait::async_trait;
use ossign_core::domain::workflow::WorkflowStatus;
use ossign_core::dto::dispatch::DispatchRequest;
use reqwest::Url;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::operation::Operation;
use crate::response::ApiResponse;
use crate::{SigningClient, WorkflowApi};

impl SigningClient {
    /// Issue one authenticated request against the signing service
    ///
    /// Dispatch requests carry the JSON payload; checks send no body. No
    /// retries happen here.
    ///
    /// # Arguments
    /// * `operation` - Which endpoint to call
    /// * `payload` - Request body, if any
    ///
    /// # Returns
    /// The snapshot the service answered with
    pub async fn call(
        &self,
        operation: &Operation,
        payload: Option<&DispatchRequest>,
    ) -> Result<WorkflowStatus> {
        let url = self.endpoint(operation)?;

        let mut request = self.client.post(url).bearer_auth(&self.token);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;

        self.handle_response(operation, response).await
    }

    /// Builds the endpoint URL, percent-encoding each path segment
    fn endpoint(&self, operation: &Operation) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("Invalid base URL {}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("Base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(operation.segments());

        Ok(url)
    }

    /// Check the status code, then classify the body as snapshot or error envelope
    async fn handle_response(
        &self,
        operation: &Operation,
        response: reqwest::Response,
    ) -> Result<WorkflowStatus> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                error_text,
            ));
        }

        let body = response.text().await?;

        debug!("Response from API {}: {}", operation, body);

        ApiResponse::parse(&body)?.into_result()
    }
}

#[async_trait]
impl WorkflowApi for SigningClient {
    async fn dispatch(&self, account: &str, request: &DispatchRequest) -> Result<WorkflowStatus> {
        let operation = Operation::Dispatch {
            account: account.to_string(),
        };

        self.call(&operation, Some(request)).await
    }

    async fn check(&self, account: &str, job_id: &str) -> Result<WorkflowStatus> {
        let operation = Operation::Check {
            account: account.to_string(),
            job_id: job_id.to_string(),
            route: self.check_route,
        };

        self.call(&operation, None).await
    }
}

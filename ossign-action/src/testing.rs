//! Scripted in-memory signing service for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ossign_client::{ClientError, ReleaseAsset, Result, WorkflowApi, WorkflowStatus};
use ossign_core::dto::dispatch::DispatchRequest;

/// Answers calls from queued responses and records every call made
#[derive(Default)]
pub struct FakeApi {
    dispatch_responses: Mutex<VecDeque<Result<WorkflowStatus>>>,
    check_responses: Mutex<VecDeque<Result<WorkflowStatus>>>,
    check_fallback: Option<WorkflowStatus>,
    dispatches: Mutex<Vec<(String, DispatchRequest)>>,
    checks: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_dispatch(self, response: Result<WorkflowStatus>) -> Self {
        self.dispatch_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_check(self, response: Result<WorkflowStatus>) -> Self {
        self.check_responses.lock().unwrap().push_back(response);
        self
    }

    /// Answer every check after the queued ones with `status`
    pub fn repeat_check(mut self, status: WorkflowStatus) -> Self {
        self.check_fallback = Some(status);
        self
    }

    pub fn dispatches(&self) -> Vec<(String, DispatchRequest)> {
        self.dispatches.lock().unwrap().clone()
    }

    /// Recorded checks as `account/job_id`
    pub fn check_calls(&self) -> Vec<String> {
        self.checks.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.dispatches.lock().unwrap().len() + self.checks.lock().unwrap().len()
    }
}

#[async_trait]
impl WorkflowApi for FakeApi {
    async fn dispatch(&self, account: &str, request: &DispatchRequest) -> Result<WorkflowStatus> {
        self.dispatches
            .lock()
            .unwrap()
            .push((account.to_string(), request.clone()));

        self.dispatch_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::InvalidConfig("unexpected dispatch".into())))
    }

    async fn check(&self, account: &str, job_id: &str) -> Result<WorkflowStatus> {
        self.checks
            .lock()
            .unwrap()
            .push(format!("{}/{}", account, job_id));

        let queued = self.check_responses.lock().unwrap().pop_front();
        match (queued, &self.check_fallback) {
            (Some(response), _) => response,
            (None, Some(status)) => Ok(status.clone()),
            (None, None) => Err(ClientError::InvalidConfig("unexpected check".into())),
        }
    }
}

pub fn dispatched(id: &str) -> WorkflowStatus {
    WorkflowStatus {
        id: id.to_string(),
        username: Some("acme".to_string()),
        run_id: Some(4242),
        last_status: Some("queued".to_string()),
        completed: Some(false),
        ..Default::default()
    }
}

pub fn running(id: &str, status: &str) -> WorkflowStatus {
    WorkflowStatus {
        id: id.to_string(),
        last_status: Some(status.to_string()),
        completed: Some(false),
        ..Default::default()
    }
}

pub fn completed(id: &str, assets: usize) -> WorkflowStatus {
    WorkflowStatus {
        id: id.to_string(),
        last_status: Some("completed".to_string()),
        completed: Some(true),
        release_assets: Some((1..=assets).map(asset).collect()),
        ..Default::default()
    }
}

pub fn asset(n: usize) -> ReleaseAsset {
    ReleaseAsset {
        id: format!("a{n}"),
        name: format!("pkg{n}.exe"),
        url: format!("https://api.example.test/assets/a{n}"),
        browser_download_url: format!("https://downloads.example.test/pkg{n}.exe"),
    }
}

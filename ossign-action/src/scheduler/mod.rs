//! Scheduler layer for the action
//!
//! Polls the signing service for the status of a dispatched workflow until
//! it completes or the overall deadline passes.

pub mod poller;

pub use poller::{PollSettings, RetryPolicy, WorkflowPoller};

//! Service layer
//!
//! Business logic for starting signing workflows.

pub mod dispatch;

pub use dispatch::dispatch_workflow;

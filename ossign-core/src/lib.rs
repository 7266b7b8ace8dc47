//! OSSign Core
//!
//! Core types shared by the OSSign signing-service client and the CI action.
//!
//! This crate contains:
//! - Domain types: the remote service's view of a workflow run and its assets
//! - DTOs: request payloads sent to the signing service
//! - Ref handling: turning a triggering git ref into a human-readable name

pub mod domain;
pub mod dto;
pub mod git_ref;

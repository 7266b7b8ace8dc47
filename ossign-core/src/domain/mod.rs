//! Core domain types
//!
//! These types mirror the signing service's responses. They are value objects:
//! every dispatch or check call produces a fresh snapshot, nothing is mutated
//! in place.

pub mod workflow;

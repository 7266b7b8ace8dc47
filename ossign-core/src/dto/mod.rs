//! Data Transfer Objects sent to the signing service

pub mod dispatch;

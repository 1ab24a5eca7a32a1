//! Lambda-facing adapters and handlers for upload notifications.
//!
//! This crate owns runtime integration details (the Lambda handler and the
//! diagnostic sink) and re-exports the domain crate as a single module
//! boundary.

pub mod adapters;
pub mod handlers;

pub use upload_notice_core as domain;

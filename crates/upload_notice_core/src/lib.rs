//! Upload notification domain primitives.
//!
//! This crate owns the notification event contract, shape validation and
//! confirmation message formatting. It intentionally excludes Lambda runtime
//! and logging concerns.

pub mod contract;
pub mod message;
pub mod object_key;

//! Homework module - interpretation of the status API payload.
//!
//! This module contains:
//! - [`response`]: structural validation of a decoded payload
//! - [`status`]: status verdicts and the notification template

pub mod response;
pub mod status;

pub use response::{validate, ApiResponse};
pub use status::{describe, HomeworkRecord, HomeworkStatus};

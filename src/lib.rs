//! homework-bot - Homework review status notifier
//!
//! This library polls the homework status API, turns status changes into
//! human-readable messages and forwards them to a Telegram chat.

pub mod api;
pub mod config;
pub mod error;
pub mod homework;
pub mod logging;
pub mod notifier;
pub mod poller;
pub mod ui;

pub use error::{Error, Result};

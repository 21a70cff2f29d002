//! # Strings Module
//!
//! Centralizes log lines and host-facing message text.

pub mod logs;
pub mod messages;

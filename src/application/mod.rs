//! # Application Layer
//!
//! The tool catalog and the dispatcher that maps tool calls onto API requests.

pub mod catalog;
pub mod dispatch;

//! # Domain Layer
//!
//! Core definitions, types, errors and traits shared across the adapter.
//! Independent of the HTTP client and the MCP framework, serving as the contract for other layers.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

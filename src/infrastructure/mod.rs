//! # Infrastructure Layer
//!
//! Handles interactions with external systems: the Paper Invest REST API and the MCP host.
//! Implements the traits defined in the Domain layer (ApiClient, TokenExchange).

pub mod auth;
pub mod http;
pub mod mcp;

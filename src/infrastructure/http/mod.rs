//! # HTTP
//!
//! Outbound calls to the Paper Invest REST API.

pub mod gateway;

pub use gateway::ApiGateway;

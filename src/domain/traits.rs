//! # Domain Traits
//!
//! Abstract interfaces for the outbound side of the adapter.
//! Allows the dispatcher and token cache to be exercised without a network.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::ApiError;
use crate::domain::types::ApiRequest;

/// Abstract interface for an authenticated client of the trading API
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Issue a request and return the decoded response body
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// Abstract interface for exchanging a long-lived API key for a bearer token
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, api_key: &str) -> Result<String, ApiError>;
}

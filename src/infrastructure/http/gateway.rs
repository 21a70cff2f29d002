//! # API Gateway
//!
//! Issues requests against the trading API. Every request looks up a bearer token
//! from the [`TokenCache`] first, so a token refreshed mid-session is picked up on
//! the very next call.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::domain::config::AppConfig;
use crate::domain::error::ApiError;
use crate::domain::traits::ApiClient;
use crate::domain::types::{ApiRequest, HttpMethod};
use crate::infrastructure::auth::{HttpTokenExchange, TokenCache};
use crate::strings::logs;

/// Authenticated client of the trading API
pub struct ApiGateway {
    http: Client,
    base_url: String,
    api_key: String,
    exchange: HttpTokenExchange,
    tokens: TokenCache,
}

impl ApiGateway {
    /// Build a gateway from resolved configuration. The token cache starts empty.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            exchange: HttpTokenExchange::new(http.clone(), &config.api_url),
            http,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            tokens: TokenCache::new(),
        })
    }

    #[cfg(test)]
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON when possible, otherwise the raw text as a JSON string
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl ApiClient for ApiGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let token = self.tokens.get_token(&self.exchange, &self.api_key).await?;

        let method = request.method.as_str();
        tracing::debug!("{}", logs::outbound_request(method, &request.path));

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http
            .request(to_method(request.method), &url)
            .bearer_auth(&token);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if status.is_success() {
            return Ok(parse_body(&text));
        }

        tracing::warn!("{}", logs::remote_failure(method, &request.path, status.as_u16()));
        if status == StatusCode::UNAUTHORIZED && self.tokens.invalidate(&token) {
            tracing::info!("{}", logs::TOKEN_INVALIDATED);
        }

        Err(ApiError::Remote {
            status: status.as_u16(),
            payload: (!text.is_empty()).then(|| parse_body(&text)),
        })
    }
}

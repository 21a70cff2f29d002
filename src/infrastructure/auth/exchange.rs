//! Exchanges the API key for a bearer token via `POST /auth/token`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::error::ApiError;
use crate::domain::traits::TokenExchange;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Token exchange against the trading API's auth endpoint
#[derive(Debug, Clone)]
pub struct HttpTokenExchange {
    http: Client,
    url: String,
}

impl HttpTokenExchange {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            url: format!("{}/auth/token", base_url),
        }
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self, api_key: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(&self.url)
            .json(&TokenRequest { api_key })
            .send()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Auth(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Auth(format!("malformed token response: {}", e)))?;

        Ok(body.token)
    }
}

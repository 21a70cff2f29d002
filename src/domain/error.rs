//! # Errors
//!
//! Failure taxonomy for outbound calls and tool dispatch.
//! Startup errors are plain `anyhow` errors raised from `main`.

use serde_json::Value;
use thiserror::Error;

/// Failures raised while talking to the trading API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Exchanging the API key for a bearer token failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Remote { status: u16, payload: Option<Value> },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to read response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Body returned by the remote API alongside a failure, if any
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Remote { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures of a single tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("No arguments provided")]
    MissingArguments,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ToolError {
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ToolError::Api(err) => err.payload(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ToolError::UnknownTool("sell_everything".into()).to_string(),
            "Unknown tool: sell_everything"
        );
        assert_eq!(ToolError::MissingArguments.to_string(), "No arguments provided");
        assert_eq!(
            ApiError::Auth("connection refused".into()).to_string(),
            "Authentication failed: connection refused"
        );

        // Api errors pass their message through untouched
        let err = ToolError::from(ApiError::Remote {
            status: 400,
            payload: None,
        });
        assert_eq!(err.to_string(), "Request failed with status code 400");
    }

    #[test]
    fn test_payload_access() {
        let err = ToolError::from(ApiError::Remote {
            status: 422,
            payload: Some(json!({"error": "insufficient funds"})),
        });
        assert_eq!(err.payload(), Some(&json!({"error": "insufficient funds"})));

        assert!(ToolError::MissingArguments.payload().is_none());
        assert!(ApiError::Transport("timeout".into()).payload().is_none());
        assert_eq!(ApiError::Transport("timeout".into()).status(), None);
    }
}

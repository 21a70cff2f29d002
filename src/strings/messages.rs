//! # Messages
//!
//! Contains constant strings and format functions for text returned to the MCP host
//! or printed before the server starts.

pub const MISSING_API_KEY: &str = "PAPER_INVEST_API_KEY environment variable is required";

pub const SERVER_NAME: &str = "paper-invest";
pub const SERVER_TITLE: &str = "Paper Invest";
pub const SERVER_INSTRUCTIONS: &str = "Paper trading tools for the Paper Invest API. \
    Manage accounts and portfolios, place and cancel orders, and read market data and activity logs.";

/// Text block of an error-flagged tool result: the message on the first line,
/// then the compact remote payload (or nothing).
pub fn tool_error(message: &str, payload: Option<&str>) -> String {
    format!("Error: {message}\n{}", payload.unwrap_or_default())
}

pub fn startup_error(err: &str) -> String {
    format!("Error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_format() {
        assert_eq!(
            tool_error("Unknown tool: foo", None),
            "Error: Unknown tool: foo\n"
        );
        assert_eq!(
            tool_error("Request failed with status code 400", Some(r#"{"error":"bad"}"#)),
            "Error: Request failed with status code 400\n{\"error\":\"bad\"}"
        );
    }
}

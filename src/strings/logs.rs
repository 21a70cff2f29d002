//! Log line text, kept together so the wording stays consistent.

pub const SERVER_READY: &str = "MCP server ready on stdio";
pub const SERVER_SHUTDOWN: &str = "MCP server shutdown complete";
pub const TOKEN_CACHE_HIT: &str = "Using cached bearer token";
pub const TOKEN_INVALIDATED: &str = "Remote API rejected bearer token (401), cache cleared";

pub fn server_starting(api_url: &str) -> String {
    format!("Starting Paper Invest MCP server against {api_url}")
}

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration file {path}")
}

pub fn token_refreshed(expiry: &str) -> String {
    format!("Obtained new bearer token, valid until {expiry}")
}

pub fn token_expiry_fallback(err: &str) -> String {
    format!("Could not read token expiry ({err}), assuming one hour")
}

pub fn token_exchange_failed(err: &str) -> String {
    format!("Token exchange failed: {err}")
}

pub fn outbound_request(method: &str, path: &str) -> String {
    format!("-> {method} {path}")
}

pub fn remote_failure(method: &str, path: &str, status: u16) -> String {
    format!("<- {method} {path} failed with status {status}")
}

pub fn tool_called(name: &str) -> String {
    format!("Tool call: {name}")
}

pub fn tool_failed(name: &str, err: &str) -> String {
    format!("Tool {name} failed: {err}")
}

//! # Authentication
//!
//! Bearer token acquisition and caching for outbound calls.

pub mod claims;
pub mod exchange;
pub mod token_cache;

pub use exchange::HttpTokenExchange;
pub use token_cache::TokenCache;

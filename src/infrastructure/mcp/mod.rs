//! # MCP Module
//!
//! Model Context Protocol server side: serves the tool catalog to the host over stdio.

pub mod server;

pub use server::PaperInvestServer;

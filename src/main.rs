//! # Main Entry Point
//!
//! Exposes the Paper Invest trading API as MCP tools over stdio:
//! - Domain: Configuration, Types, Errors, Traits
//! - Infrastructure: Token cache, HTTP gateway, MCP server
//! - Application: Tool catalog and dispatcher
//!

mod application;
mod domain;
mod infrastructure;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::application::dispatch::Dispatcher;
use crate::domain::config::{AppConfig, ConfigOverrides};
use crate::infrastructure::http::ApiGateway;
use crate::infrastructure::mcp::PaperInvestServer;
use crate::strings::{logs, messages};

#[derive(Parser, Debug)]
#[command(name = "paper-invest-mcp")]
#[command(about = "MCP server for the Paper Invest paper-trading API")]
#[command(version)]
struct Cli {
    /// Base URL of the Paper Invest API
    #[arg(long, env = "PAPER_INVEST_API_URL")]
    api_url: Option<String>,

    /// API key exchanged for bearer tokens
    #[arg(long, env = "PAPER_INVEST_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Path to a YAML config file
    #[arg(short, long, env = "PAPER_INVEST_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log filter (trace, debug, info, warn, error or a full EnvFilter directive)
    #[arg(long, env = "PAPER_INVEST_LOG")]
    log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            api_url: cli.api_url,
            api_key: cli.api_key,
            config_path: cli.config,
            timeout_secs: cli.timeout,
            log_level: cli.log_level,
            log_file: cli.log_file,
        }
    }
}

/// Install stderr logging (stdout carries the protocol) plus an optional file sink.
fn init_logging(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "{},hyper=warn,reqwest=warn,rmcp=warn",
            config.log_level
        ))
    });

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .context("Log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Configuration; a missing API key ends the process here
    let cli = Cli::parse();
    let config = match AppConfig::resolve(cli.into()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", messages::startup_error(&format!("{err:#}")));
            std::process::exit(1);
        }
    };

    // 2. Logging; the guard flushes the file sink on exit
    let _guard = init_logging(&config)?;
    tracing::info!("{}", logs::server_starting(&config.api_url));
    if let Some(path) = &config.config_file {
        tracing::info!("{}", logs::config_loaded(&path.display().to_string()));
    }
    tracing::debug!("{:?}", config);

    // 3. Wire gateway -> dispatcher -> server
    let gateway = ApiGateway::new(&config)?;
    let dispatcher = Dispatcher::new(Arc::new(gateway));
    let server = PaperInvestServer::new(dispatcher);

    // 4. Serve until the host closes stdin
    server.serve_stdio().await
}

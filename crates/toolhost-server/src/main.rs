//! toolhost: stdio MCP server
//!
//! Usage:
//!   toolhost --config config/mcp_config.json
//!   TOOLHOST_CONFIG=~/tools.yaml toolhost --log-level debug

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use toolhost_core::config::FileConfigProvider;
use toolhost_core::{
    build_engine, log_error, log_info, ConsoleLogger, LogLevel, Logger, ServerConfig, ToolHostService,
};

#[derive(Parser, Debug)]
#[command(version, about = "Toolhost MCP server - exposes configured tools over stdio")]
struct Args {
    /// Configuration file (JSON, or YAML by extension)
    #[arg(short, long, env = "TOOLHOST_CONFIG")]
    config: Option<PathBuf>,

    /// Override `logging.level` from the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Refuse to start when the config file is missing or malformed
    #[arg(long)]
    strict: bool,
}

/// Explicit path, then the project config, then the user config
fn config_provider(explicit: Option<PathBuf>) -> FileConfigProvider {
    if let Some(path) = explicit {
        return FileConfigProvider::new(path);
    }
    let project = FileConfigProvider::project();
    if project.exists() {
        return project;
    }
    let user = FileConfigProvider::user();
    if user.exists() {
        user
    } else {
        project
    }
}

fn load_config(provider: &FileConfigProvider, strict: bool) -> anyhow::Result<ServerConfig> {
    if strict {
        return provider
            .load()
            .with_context(|| format!("loading {}", provider.path().display()));
    }
    // Level is not known yet; report config problems at the default threshold
    Ok(provider.load_or_default(&ConsoleLogger::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let provider = config_provider(args.config);
    let config = load_config(&provider, args.strict)?;

    let level = args
        .log_level
        .as_deref()
        .map(LogLevel::parse_or_default)
        .unwrap_or_else(|| config.log_level());
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new().with_level(level));

    let engine = Arc::new(build_engine(&config, logger.clone()).context("building dispatch engine")?);
    log_info!(
        logger,
        "[Server] Starting with {} capabilities",
        engine.list_capabilities().len()
    );

    let service = ToolHostService::new(engine.clone(), logger.clone());
    let outcome = tokio::select! {
        result = service.serve_stdio() => result.map_err(anyhow::Error::from),
        signal = tokio::signal::ctrl_c() => {
            log_info!(logger, "[Server] Interrupted, shutting down");
            signal.map_err(anyhow::Error::from)
        }
    };

    if let Err(e) = &outcome {
        log_error!(logger, "[Server] {:#}", e);
    }
    engine.shutdown().await;
    outcome
}

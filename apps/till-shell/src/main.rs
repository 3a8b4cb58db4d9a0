//! # Till Shell
//!
//! Line-oriented front end for the basket service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                Till Shell                               │
//! │                                                                         │
//! │  stdin ───► Line::from_str ───► execute() ───► BasketService            │
//! │                  │                  │                │                  │
//! │                  │ parse error      │                ▼                  │
//! │                  ▼                  ▼           MemoryStore             │
//! │  stdout ◄── InvalidCommand    Reply / ErrorResponse ──► stdout          │
//! │                                                                         │
//! │  one JSON object per line on stdout; stderr ◄── tracing                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `till [--config <path>]`

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use till_service::{BasketService, ErrorResponse};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{execute, InvalidCommand, Line, HELP};
use crate::config::ShellConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = parse_args(std::env::args().skip(1))?;
    let config = ShellConfig::load(config_path).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries only replies
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let catalog = config.catalog().context("Invalid product catalog")?;
    let rules = config
        .rule_catalog(&catalog)
        .context("Invalid promotion rules")?;
    info!(
        products = catalog.len(),
        rules = rules.len(),
        "Catalogs loaded"
    );

    let service = BasketService::in_memory(Arc::new(catalog), Arc::new(rules));

    tokio::select! {
        result = run(&service) => result?,
        _ = shutdown_signal() => {},
    }

    info!("Shutdown complete");
    Ok(())
}

fn parse_args<I>(mut args: I) -> anyhow::Result<Option<PathBuf>>
where
    I: Iterator<Item = String>,
{
    let mut config_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            other => bail!("Unknown argument: {}\nUsage: till [--config <path>]", other),
        }
    }
    Ok(config_path)
}

/// Reads commands until end of input or `quit`.
async fn run(service: &BasketService) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Line>() {
            Ok(Line::Command(command)) => command,
            Ok(Line::Help) => {
                emit_text(&mut stdout, HELP).await?;
                continue;
            }
            Ok(Line::Quit) => break,
            Err(commands::ParseError::Empty) => continue,
            Err(e) => {
                warn!(line = %line, error = %e, "Invalid command");
                emit(&mut stdout, &InvalidCommand::from(&e)).await?;
                continue;
            }
        };

        match execute(service, &command) {
            Ok(reply) => emit(&mut stdout, &reply).await?,
            Err(e) => {
                warn!(?command, error = %e, "Command failed");
                emit(&mut stdout, &ErrorResponse::from(&e)).await?;
            }
        }
    }

    Ok(())
}

async fn emit<T: Serialize>(stdout: &mut tokio::io::Stdout, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    emit_text(stdout, &json).await
}

async fn emit_text(stdout: &mut tokio::io::Stdout, text: &str) -> anyhow::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&[])).unwrap(), None);
        assert_eq!(
            parse_args(args(&["--config", "till.toml"])).unwrap(),
            Some(PathBuf::from("till.toml"))
        );
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}

/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Get Core. Serves the d4rko.mpv package
    repository to WinGet clients through a read-only REST
    source built from the singleton manifests on GitHub.

  Security / Safety Notes:
    Operates within user privileges. Performs HTTPS GET
    requests upstream and answers HTTP requests locally.

  Dependencies:
    clap for CLI parsing, chrono for session stamps, tokio for
    the runtime.

  Operational Scope:
    Run as a long-lived service behind the operator's reverse
    proxy, or locally for client testing.

  Revision History:
    2026-10-17 COD  Authored Syn-Get Core runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod config;
mod document;
mod error;
mod logger;
mod response;
mod router;
mod search;
mod server;
mod service;
mod shaper;
mod upstream;
mod versioning;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{ArgAction, Parser};

use config::ServiceConfig;
use error::Result;
use logger::Logger;
use service::Service;
use upstream::GitHubClient;

/// Command-line arguments for Syn-Get-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Get-Core",
    version,
    author = "Synavera Systems",
    about = "Read-only WinGet REST source for the d4rko.mpv repository"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the listen address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[Syn-Get-Core] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load_from_optional_path(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .unwrap_or_else(|| config.log_dir().join(format!("rest_{session_stamp}.log")));
    let logger = Arc::new(Logger::new(Some(log_path), cli.verbose)?);
    logger.info("INIT", "Syn-Get Core awakening.");
    logger.info(
        "INIT",
        format!(
            "Serving {} from {}/{} (upstream token: {})",
            config.identity.package_identifier,
            config.identity.owner,
            config.identity.repository,
            if config.upstream.token.is_some() {
                "present"
            } else {
                "absent"
            }
        ),
    );

    let client = GitHubClient::new(&config.upstream, &config.identity)?;
    let bind = config.server.bind;
    let service = Arc::new(Service::new(client, Arc::new(config), logger.clone()));

    server::serve(service, bind, logger.clone()).await?;

    logger.info("COMPLETE", "Syn-Get Core at rest.");
    logger.finalize()?;
    Ok(())
}

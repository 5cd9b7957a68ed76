// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod protocol;
pub mod server;
pub mod translate;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::exec::prepare_broker;
use crate::pipeline::SchedulePipeline;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the startup guard (scheduler executable, working directory)
/// - the request pipeline
/// - the HTTP server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(&args)?;

    // Fatal on failure: the service must not serve without a scheduler.
    let broker = prepare_broker(&cfg).await?;

    if args.check {
        print_check(&cfg)?;
        return Ok(());
    }

    let shutdown = CancellationToken::new();

    // Ctrl-C → graceful shutdown; in-flight scheduler runs are cancelled.
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("shutdown requested");
            token.cancel();
        });
    }

    let pipeline = SchedulePipeline::new(
        Arc::new(broker),
        cfg.task_defaults.clone(),
        shutdown.clone(),
    );

    server::serve(&cfg.server, pipeline, shutdown).await?;
    Ok(())
}

/// `--check` output: the effective configuration after all overrides.
fn print_check(cfg: &ConfigFile) -> Result<()> {
    println!("schedbridge check: OK");
    println!();
    println!("{}", toml::to_string_pretty(cfg)?);

    debug!("check complete (not serving)");
    Ok(())
}

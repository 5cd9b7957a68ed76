// src/server/mod.rs

//! HTTP surface.
//!
//! - `POST /v1/schedule` runs the [`SchedulePipeline`].
//! - `GET /` is a side-effect-free liveness probe.

pub mod error;
pub mod handlers;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServerSection;
use crate::errors::Result;
use crate::pipeline::SchedulePipeline;

pub use error::{ApiError, ErrorBody, ErrorDetail};

pub const SCHEDULE_PATH: &str = "/v1/schedule";
pub const LIVENESS_PATH: &str = "/";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: SchedulePipeline,
    pub max_request_bytes: usize,
}

/// Build the router. Exposed separately from [`serve`] for tests.
pub fn router(pipeline: SchedulePipeline, max_request_bytes: usize) -> Router {
    Router::new()
        .route(LIVENESS_PATH, get(handlers::liveness_handler))
        .route(SCHEDULE_PATH, post(handlers::schedule_handler))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .with_state(AppState {
            pipeline,
            max_request_bytes,
        })
}

/// Bind and serve until `shutdown` is cancelled.
pub async fn serve(
    cfg: &ServerSection,
    pipeline: SchedulePipeline,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = router(pipeline, cfg.max_request_bytes);

    let address = format!("{}:{}", cfg.host, cfg.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding HTTP listener to {address}"))?;
    info!(address = %listener.local_addr()?, "scheduling bridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

// src/pipeline.rs

//! Request pipeline: validate → translate → run scheduler → translate back.
//!
//! Transport-independent; the HTTP layer in [`crate::server`] is a thin
//! shell around [`SchedulePipeline::schedule`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::SchedulerBackend;
use crate::protocol::backend::TaskDefaults;
use crate::protocol::request::ScheduleRequest;
use crate::protocol::response::ScheduleResponse;
use crate::protocol::validate::validate_request;
use crate::translate::{backend_results_to_schedule, dag_to_backend_tasks};

/// Stateless per request; cheap to clone and share across handlers.
#[derive(Clone)]
pub struct SchedulePipeline {
    backend: Arc<dyn SchedulerBackend>,
    defaults: Arc<TaskDefaults>,
    shutdown: CancellationToken,
}

impl SchedulePipeline {
    pub fn new(
        backend: Arc<dyn SchedulerBackend>,
        defaults: TaskDefaults,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            backend,
            defaults: Arc::new(defaults),
            shutdown,
        }
    }

    /// Token for one request. Cancelled on service shutdown, or earlier by
    /// the caller.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Run the full pipeline for one request.
    pub async fn schedule(
        &self,
        request: &ScheduleRequest,
        cancel: CancellationToken,
    ) -> Result<ScheduleResponse> {
        validate_request(request)?;

        let tasks = dag_to_backend_tasks(&request.dag, &self.defaults);
        debug!(
            nodes = request.dag.nodes.len(),
            edges = request.dag.edges.len(),
            cores = request.resources.cores.len(),
            "translated DAG to backend tasks"
        );

        let results = self.backend.schedule(tasks, cancel).await?;
        let response = backend_results_to_schedule(&results);

        info!(
            tasks = response.schedule.len(),
            "schedule produced"
        );
        Ok(response)
    }
}

impl std::fmt::Debug for SchedulePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulePipeline")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

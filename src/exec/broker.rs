// src/exec/broker.rs

//! Execution broker: one task list in, one scheduler run, one result list out.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};

use crate::errors::{BridgeError, Result};
use crate::protocol::backend::BackendTask;

use super::artifacts::ArtifactPair;
use super::backend::{BackendFuture, SchedulerBackend};
use super::worker::{run_process, Invocation};

#[derive(Debug)]
struct BrokerInner {
    executable: PathBuf,
    backend_dir: PathBuf,
    work_dir: PathBuf,
    timeout: Option<Duration>,
}

/// Owns the shared working directory and drives scheduler runs.
///
/// Every run happens in its own spawned Tokio task that owns the run's
/// [`ArtifactPair`], so a slow scheduler never stalls other requests and the
/// artifacts are released on every exit path.
#[derive(Debug, Clone)]
pub struct ExecutionBroker {
    inner: Arc<BrokerInner>,
}

impl ExecutionBroker {
    /// `executable` should be absolute: the scheduler runs with `backend_dir`
    /// as its working directory. `work_dir` must already exist (see
    /// [`super::startup`]).
    pub fn new(
        executable: impl Into<PathBuf>,
        backend_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(BrokerInner {
                executable: executable.into(),
                backend_dir: backend_dir.into(),
                work_dir: work_dir.into(),
                timeout,
            }),
        }
    }

    /// Run the scheduler once for `tasks`.
    pub async fn run(&self, tasks: Vec<BackendTask>, cancel: CancellationToken) -> Result<Vec<Value>> {
        let artifacts = ArtifactPair::allocate(&self.inner.work_dir);
        let span = tracing::info_span!("scheduler_run", request_id = %artifacts.request_id());
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(
            async move {
                let result = inner.invoke(&artifacts, &tasks, &cancel).await;
                artifacts.release().await;
                result
            }
            .instrument(span),
        );

        handle
            .await
            .map_err(|e| BridgeError::Other(anyhow!("scheduler worker task failed: {e}")))?
    }
}

impl BrokerInner {
    async fn invoke(
        &self,
        artifacts: &ArtifactPair,
        tasks: &[BackendTask],
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>> {
        let payload = serde_json::to_vec_pretty(tasks)?;
        tokio::fs::write(artifacts.input(), &payload)
            .await
            .with_context(|| format!("writing input artifact {}", artifacts.input().display()))?;

        debug!(tasks = tasks.len(), input = %artifacts.input().display(), "wrote input artifact");

        let invocation = Invocation {
            program: self.executable.clone(),
            args: vec![
                artifacts.input().as_os_str().to_owned(),
                artifacts.output().as_os_str().to_owned(),
            ],
            cwd: self.backend_dir.clone(),
            timeout: self.timeout,
        };

        let output = run_process(&invocation, cancel).await?;

        if !output.success {
            return Err(BridgeError::ExecutionFailure {
                exit_code: output.exit_code.unwrap_or(-1),
                stderr: output.stderr,
            });
        }

        let raw = match tokio::fs::read(artifacts.output()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BridgeError::protocol(format!(
                    "scheduler did not produce an output file. Stderr: {}",
                    output.stderr
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let results = parse_results(&raw)?;
        info!(results = results.len(), "scheduler run complete");
        Ok(results)
    }
}

/// Parse the output artifact as a JSON array.
pub fn parse_results(raw: &[u8]) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| BridgeError::ProtocolViolation {
        reason: "scheduler output is not valid JSON".to_string(),
        source: Some(e.into()),
    })?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(BridgeError::protocol(format!(
            "scheduler output must be a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl SchedulerBackend for ExecutionBroker {
    fn schedule(&self, tasks: Vec<BackendTask>, cancel: CancellationToken) -> BackendFuture<'_> {
        Box::pin(self.run(tasks, cancel))
    }
}

use std::sync::{Arc, Mutex};

use schedbridge::errors::{BridgeError, Result};
use schedbridge::exec::{BackendFuture, SchedulerBackend};
use schedbridge::protocol::backend::BackendTask;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

type Responder = dyn Fn(&[BackendTask]) -> Result<Vec<Value>> + Send + Sync;

/// A fake scheduler backend that:
/// - records every task list it receives
/// - answers through a caller-supplied responder, without spawning anything.
pub struct FakeBackend {
    received: Arc<Mutex<Vec<Vec<BackendTask>>>>,
    responder: Box<Responder>,
    hang_until_cancelled: bool,
}

impl FakeBackend {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&[BackendTask]) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
            hang_until_cancelled: false,
        }
    }

    /// Answer with one task record per received task, in order, using the
    /// task id as `debug_task_name`.
    pub fn echo() -> Self {
        Self::new(|tasks| {
            Ok(tasks
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    json!({
                        "current_taskId": i,
                        "debug_task_name": t.task_id,
                        "all_input": t.parent_tasks.iter().map(|p| json!({
                            "varname": p.output_var,
                            "dest_address": "0x100"
                        })).collect::<Vec<_>>()
                    })
                })
                .collect())
        })
    }

    /// Always fail as a crashing scheduler would.
    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        let stderr = stderr.to_string();
        Self::new(move |_| {
            Err(BridgeError::ExecutionFailure {
                exit_code,
                stderr: stderr.clone(),
            })
        })
    }

    /// Never answer; resolve with `Cancelled` once the token fires.
    pub fn hanging() -> Self {
        let mut backend = Self::new(|_| Ok(Vec::new()));
        backend.hang_until_cancelled = true;
        backend
    }

    /// Shared handle to the recorded task lists.
    pub fn received(&self) -> Arc<Mutex<Vec<Vec<BackendTask>>>> {
        Arc::clone(&self.received)
    }
}

impl SchedulerBackend for FakeBackend {
    fn schedule(&self, tasks: Vec<BackendTask>, cancel: CancellationToken) -> BackendFuture<'_> {
        Box::pin(async move {
            let result = (self.responder)(&tasks);
            self.received.lock().unwrap().push(tasks);

            if self.hang_until_cancelled {
                cancel.cancelled().await;
                return Err(BridgeError::Cancelled);
            }
            result
        })
    }
}

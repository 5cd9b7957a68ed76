// src/exec/worker.rs

//! Single external-process run with a time bound and cancellation.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{BridgeError, Result};

/// How long to keep reading stderr once the process itself has exited.
const STDERR_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// What to run and where.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stderr: String,
}

/// Run `invocation` to completion.
///
/// - stdout is drained and logged at debug; stderr is captured.
/// - If `cancel` fires or the timeout elapses first, the child is killed and
///   [`BridgeError::Cancelled`] / [`BridgeError::Timeout`] is returned.
/// - The child is spawned with `kill_on_drop(true)`, so dropping this future
///   also terminates it.
pub async fn run_process(invocation: &Invocation, cancel: &CancellationToken) -> Result<ProcessOutput> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning {}", invocation.program.display()))?;

    let pid = child.id();
    debug!(?pid, program = %invocation.program.display(), "process started");

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(?pid, "stdout: {}", line);
            }
        });
    }

    let stderr_buf = Arc::new(Mutex::new(Vec::new()));
    let stderr_task = child.stderr.take().map(|mut stderr| {
        let buf = Arc::clone(&stderr_buf);
        tokio::spawn(async move {
            let mut chunk = [0u8; 4096];
            while let Ok(n) = stderr.read(&mut chunk).await {
                if n == 0 {
                    break;
                }
                if let Ok(mut buf) = buf.lock() {
                    buf.extend_from_slice(&chunk[..n]);
                }
            }
        })
    });

    let deadline_at = invocation.timeout.map(|limit| Instant::now() + limit);
    let deadline = async {
        match deadline_at {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for {}", invocation.program.display()))?;

            if let Some(handle) = stderr_task {
                drain_stderr(handle, pid, deadline_at, cancel).await?;
            }
            let stderr = stderr_buf
                .lock()
                .map(|buf| String::from_utf8_lossy(&buf).into_owned())
                .unwrap_or_default();

            info!(
                ?pid,
                exit_code = status.code(),
                success = status.success(),
                "process exited"
            );

            Ok(ProcessOutput {
                exit_code: status.code(),
                success: status.success(),
                stderr,
            })
        }

        _ = cancel.cancelled() => {
            info!(?pid, "cancellation requested; killing process");
            if let Err(e) = child.kill().await {
                warn!(?pid, error = %e, "failed to kill process on cancellation");
            }
            Err(BridgeError::Cancelled)
        }

        _ = deadline => {
            let limit = invocation.timeout.unwrap_or_default();
            warn!(?pid, ?limit, "process exceeded time limit; killing");
            if let Err(e) = child.kill().await {
                warn!(?pid, error = %e, "failed to kill process after timeout");
            }
            Err(BridgeError::Timeout(limit))
        }
    }
}

/// Wait for the stderr reader after the process has exited.
///
/// A descendant that inherited stderr can keep the pipe open long after the
/// scheduler itself is gone. The wait is bounded by [`STDERR_DRAIN_GRACE`]
/// and by the run's deadline; past that, whatever was captured is used.
async fn drain_stderr(
    mut handle: JoinHandle<()>,
    pid: Option<u32>,
    deadline_at: Option<Instant>,
    cancel: &CancellationToken,
) -> Result<()> {
    let grace_end = Instant::now() + STDERR_DRAIN_GRACE;
    let until = deadline_at.map_or(grace_end, |at| at.min(grace_end));

    tokio::select! {
        _ = &mut handle => Ok(()),
        _ = cancel.cancelled() => {
            handle.abort();
            Err(BridgeError::Cancelled)
        }
        _ = tokio::time::sleep_until(until) => {
            handle.abort();
            warn!(?pid, "stderr still open after process exit; using captured output");
            Ok(())
        }
    }
}

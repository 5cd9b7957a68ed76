// src/exec/startup.rs

//! One-time startup checks: scheduler executable and working directory.
//!
//! Runs before the server binds; any failure here is fatal.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{BackendSection, ConfigFile};
use crate::errors::{BridgeError, Result};

use super::broker::ExecutionBroker;

/// Make sure the scheduler executable exists, building it if needed.
///
/// Returns the absolute path of the executable.
pub async fn ensure_executable(backend: &BackendSection) -> Result<PathBuf> {
    let exe = backend.executable_path();

    if exe.is_file() {
        debug!(path = %exe.display(), "scheduler executable present");
    } else {
        info!(path = %exe.display(), "scheduler executable not found; attempting to build");
        build_backend(backend).await?;

        if !exe.is_file() {
            return Err(BridgeError::Startup(format!(
                "build in '{}' succeeded but '{}' is still missing",
                backend.dir.display(),
                exe.display()
            )));
        }
        info!(path = %exe.display(), "scheduler built successfully");
    }

    exe.canonicalize().map_err(|e| {
        BridgeError::Startup(format!("resolving '{}': {e}", exe.display()))
    })
}

async fn build_backend(backend: &BackendSection) -> Result<()> {
    let jobs = backend.effective_build_jobs();
    debug!(cmd = %backend.build_command, jobs, dir = %backend.dir.display(), "running build");

    let output = Command::new(&backend.build_command)
        .arg("-j")
        .arg(jobs.to_string())
        .current_dir(&backend.dir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            BridgeError::Startup(format!(
                "failed to run '{}' in '{}': {e}",
                backend.build_command,
                backend.dir.display()
            ))
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("build stdout:\n{}", stdout);
    }

    if !output.status.success() {
        return Err(BridgeError::Startup(format!(
            "failed to build scheduler in '{}' (exit code {:?}). Error: {}",
            backend.dir.display(),
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(())
}

/// Create the working directory if needed and return its absolute path.
///
/// `create_dir_all` succeeds when the directory already exists, so several
/// instances starting at once against the same path are fine.
pub fn prepare_work_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        BridgeError::Startup(format!("creating working directory '{}': {e}", dir.display()))
    })?;
    dir.canonicalize().map_err(|e| {
        BridgeError::Startup(format!("resolving working directory '{}': {e}", dir.display()))
    })
}

/// Run every startup check and return a ready broker.
pub async fn prepare_broker(cfg: &ConfigFile) -> Result<ExecutionBroker> {
    let executable = ensure_executable(&cfg.backend).await?;
    let work_dir = prepare_work_dir(&cfg.work.dir)?;
    let backend_dir = cfg.backend.dir.canonicalize().map_err(|e| {
        BridgeError::Startup(format!("resolving '{}': {e}", cfg.backend.dir.display()))
    })?;

    info!(
        executable = %executable.display(),
        work_dir = %work_dir.display(),
        timeout = ?cfg.backend.timeout(),
        "execution broker ready"
    );

    Ok(ExecutionBroker::new(
        executable,
        backend_dir,
        work_dir,
        cfg.backend.timeout(),
    ))
}

// src/exec/artifacts.rs

//! Request-scoped input/output artifact files.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// The two files exchanged with one scheduler run.
///
/// Paths are derived from a fresh v4 UUID, so concurrent requests sharing the
/// working directory never collide; no directory locking is involved.
///
/// Files are removed exactly once: either by [`ArtifactPair::release`] or, if
/// the pair is dropped without being released (panic, aborted task), by
/// `Drop`.
#[derive(Debug)]
pub struct ArtifactPair {
    request_id: Uuid,
    input: PathBuf,
    output: PathBuf,
    released: bool,
}

impl ArtifactPair {
    /// Allocate a fresh pair inside `work_dir`. Nothing is created on disk.
    pub fn allocate(work_dir: &Path) -> Self {
        let request_id = Uuid::new_v4();
        Self {
            request_id,
            input: work_dir.join(format!("{request_id}_input.json")),
            output: work_dir.join(format!("{request_id}_output.json")),
            released: false,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Remove both files. Missing files are not an error.
    pub async fn release(mut self) {
        for path in [&self.input, &self.output] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(request_id = %self.request_id, path = %path.display(), "removed artifact"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    request_id = %self.request_id,
                    path = %path.display(),
                    error = %e,
                    "failed to remove artifact"
                ),
            }
        }
        self.released = true;
    }
}

impl Drop for ArtifactPair {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        for path in [&self.input, &self.output] {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "failed to remove artifact on drop");
                }
            }
        }
    }
}

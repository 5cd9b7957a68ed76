#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use schedbridge::exec::ExecutionBroker;
use tempfile::TempDir;

pub use schedbridge_test_utils::builders;
pub use schedbridge_test_utils::{dir_entries, init_tracing, with_timeout};

/// A throwaway scheduler installation: a backend dir holding a `main`
/// script, and an empty working directory.
pub struct ScriptedScheduler {
    _root: TempDir,
    pub backend_dir: PathBuf,
    pub work_dir: PathBuf,
    pub executable: PathBuf,
}

impl ScriptedScheduler {
    /// `body` runs as `/bin/sh` with `$1` = input path, `$2` = output path,
    /// and the backend dir as cwd.
    #[cfg(unix)]
    pub fn new(body: &str) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let backend_dir = root.path().join("scheduler");
        let work_dir = root.path().join("io");
        std::fs::create_dir_all(&backend_dir).unwrap();
        std::fs::create_dir_all(&work_dir).unwrap();

        let executable = schedbridge_test_utils::write_script(&backend_dir, "main", body);

        Self {
            backend_dir: backend_dir.canonicalize().unwrap(),
            work_dir: work_dir.canonicalize().unwrap(),
            executable: executable.canonicalize().unwrap(),
            _root: root,
        }
    }

    pub fn broker(&self, timeout: Option<Duration>) -> ExecutionBroker {
        ExecutionBroker::new(&self.executable, &self.backend_dir, &self.work_dir, timeout)
    }

    pub fn backend_file(&self, name: &str) -> PathBuf {
        self.backend_dir.join(name)
    }

    pub fn work_dir_is_empty(&self) -> bool {
        dir_entries(&self.work_dir).is_empty()
    }
}

/// Poll `cond` every 20ms for up to 5s.
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..250 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    cond()
}

pub fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

pub mod builders;
pub mod fake_backend;

use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use schedbridge::logging::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness, once per test binary.
///
/// Output shows up only for failing tests (or with `--nocapture`). The
/// filter is read from `SCHEDBRIDGE_LOG`, e.g.
/// `SCHEDBRIDGE_LOG=schedbridge::exec=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("warn,schedbridge=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, failing the test after 10 seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("test timed out after 10 seconds")
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
///
/// Used to stand in for the scheduler executable (and its build tool).
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("writing script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("making script executable");
    path
}

/// Entries currently in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("reading dir")
        .map(|e| e.expect("dir entry").path())
        .collect();
    entries.sort();
    entries
}

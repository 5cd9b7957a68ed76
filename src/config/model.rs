// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::backend::TaskDefaults;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8000
///
/// [backend]
/// dir = "scheduler_cpp"
/// executable = "main"
/// timeout_secs = 60
///
/// [work]
/// dir = "/var/tmp/schedbridge-io"
///
/// [task_defaults]
/// computation_cost = 250
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub backend: BackendSection,

    #[serde(default)]
    pub work: WorkSection,

    /// Placeholder values written into every backend task descriptor.
    #[serde(default)]
    pub task_defaults: TaskDefaults,
}

/// Validated configuration.
///
/// Can only be obtained through `TryFrom<RawConfigFile>` (see
/// [`crate::config::validate`]) or [`ConfigFile::new_unchecked`].
#[derive(Debug, Clone, Serialize)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub backend: BackendSection,
    pub work: WorkSection,
    pub task_defaults: TaskDefaults,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            server: raw.server,
            backend: raw.backend,
            work: raw.work,
            task_defaults: raw.task_defaults,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on the size of an inbound request body.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_request_bytes() -> usize {
    2 * 1024 * 1024
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

/// `[backend]` section: where the scheduler lives and how to build it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    /// Installation/source directory. The scheduler runs with this as cwd.
    #[serde(default = "default_backend_dir")]
    pub dir: PathBuf,

    /// Executable file name, relative to `dir`.
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Build tool invoked (as `<build_command> -j <jobs>`) when the
    /// executable is missing.
    #[serde(default = "default_build_command")]
    pub build_command: String,

    /// Concurrency hint for the build. `None` means host parallelism.
    #[serde(default)]
    pub build_jobs: Option<usize>,

    /// Upper bound for one scheduler run; `0` disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_dir() -> PathBuf {
    PathBuf::from("scheduler_cpp")
}

fn default_executable() -> String {
    "main".to_string()
}

fn default_build_command() -> String {
    "make".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl BackendSection {
    pub fn executable_path(&self) -> PathBuf {
        self.dir.join(&self.executable)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn effective_build_jobs(&self) -> usize {
        self.build_jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            dir: default_backend_dir(),
            executable: default_executable(),
            build_command: default_build_command(),
            build_jobs: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[work]` section: shared transient storage for request artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSection {
    #[serde(default = "default_work_dir")]
    pub dir: PathBuf,
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("schedbridge-io")
}

impl Default for WorkSection {
    fn default() -> Self {
        Self {
            dir: default_work_dir(),
        }
    }
}

// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BridgeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = BridgeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_server(cfg)?;
    validate_backend(cfg)?;
    validate_work(cfg)?;
    Ok(())
}

fn validate_server(cfg: &RawConfigFile) -> Result<()> {
    if cfg.server.host.trim().is_empty() {
        return Err(BridgeError::Config(
            "[server].host must not be empty".to_string(),
        ));
    }
    if cfg.server.max_request_bytes == 0 {
        return Err(BridgeError::Config(
            "[server].max_request_bytes must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_backend(cfg: &RawConfigFile) -> Result<()> {
    let backend = &cfg.backend;

    if backend.executable.trim().is_empty() {
        return Err(BridgeError::Config(
            "[backend].executable must not be empty".to_string(),
        ));
    }
    // The executable is resolved relative to `dir`; a path here would escape it.
    if backend.executable.contains('/') || backend.executable.contains('\\') {
        return Err(BridgeError::Config(format!(
            "[backend].executable must be a bare file name (got '{}')",
            backend.executable
        )));
    }
    if backend.build_command.trim().is_empty() {
        return Err(BridgeError::Config(
            "[backend].build_command must not be empty".to_string(),
        ));
    }
    if backend.build_jobs == Some(0) {
        return Err(BridgeError::Config(
            "[backend].build_jobs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_work(cfg: &RawConfigFile) -> Result<()> {
    if cfg.work.dir.as_os_str().is_empty() {
        return Err(BridgeError::Config(
            "[work].dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

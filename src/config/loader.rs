// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config location, relative to the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Schedbridge.toml")
}

/// Build the effective configuration for a CLI invocation.
///
/// - An explicit `--config` must exist and parse.
/// - Without `--config`, [`default_config_path`] is used if present, else
///   built-in defaults.
/// - CLI overrides are applied before validation, so they are checked too.
pub fn resolve(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = %path.display(), "using default config file");
                load_from_path(&path)?
            } else {
                debug!("no config file found; using built-in defaults");
                RawConfigFile::default()
            }
        }
    };

    apply_overrides(&mut raw, args);
    ConfigFile::try_from(raw)
}

fn apply_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(host) = &args.host {
        raw.server.host = host.clone();
    }
    if let Some(port) = args.port {
        raw.server.port = port;
    }
    if let Some(dir) = &args.backend_dir {
        raw.backend.dir = dir.clone();
    }
    if let Some(dir) = &args.work_dir {
        raw.work.dir = dir.clone();
    }
    if let Some(secs) = args.timeout_secs {
        raw.backend.timeout_secs = secs;
    }
}

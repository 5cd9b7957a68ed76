// src/config/mod.rs

//! Service configuration.
//!
//! - [`model`] holds the serde types for the TOML file.
//! - [`loader`] reads the file and merges CLI overrides.
//! - [`validate`] turns a `RawConfigFile` into a checked `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve};
pub use model::{BackendSection, ConfigFile, RawConfigFile, ServerSection, WorkSection};

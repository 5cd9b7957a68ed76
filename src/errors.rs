// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every failure that can reach the HTTP boundary is one of these variants.
//! The server layer turns them into a single JSON error shape (see
//! [`crate::server::error`]).

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The inbound request is malformed or violates graph invariants.
    /// Raised before any backend invocation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body is larger than `[server].max_request_bytes`.
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The backend process exited with a non-zero status.
    #[error("Scheduler process failed with exit code {exit_code}. Stderr: {stderr}")]
    ExecutionFailure { exit_code: i32, stderr: String },

    /// The backend exited successfully but did not honour its output contract.
    #[error("Scheduler protocol violation: {reason}")]
    ProtocolViolation {
        reason: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The backend executable is missing and could not be built.
    #[error("Startup failure: {0}")]
    Startup(String),

    #[error("Scheduler process timed out after {0:?}")]
    Timeout(Duration),

    #[error("Scheduler process was cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    /// Protocol violation without an underlying cause.
    pub fn protocol(reason: impl Into<String>) -> Self {
        BridgeError::ProtocolViolation {
            reason: reason.into(),
            source: None,
        }
    }

    /// Stable, snake_case name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Validation(_) => "validation_error",
            BridgeError::PayloadTooLarge { .. } => "payload_too_large",
            BridgeError::ExecutionFailure { .. } => "execution_failure",
            BridgeError::ProtocolViolation { .. } => "protocol_violation",
            BridgeError::Startup(_) => "startup_failure",
            BridgeError::Timeout(_) => "timeout",
            BridgeError::Cancelled => "cancelled",
            BridgeError::Config(_) => "config_error",
            BridgeError::Io(_) | BridgeError::Json(_) | BridgeError::Toml(_) => "internal_error",
            BridgeError::Other(_) => "internal_error",
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BridgeError>;

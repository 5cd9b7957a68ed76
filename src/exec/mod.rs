// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns everything on the far side of the process boundary:
//!
//! - [`startup`] verifies (or builds) the scheduler executable and prepares
//!   the shared working directory, once, before serving.
//! - [`artifacts`] names and removes the per-request input/output files.
//! - [`worker`] runs one process with a time bound and cancellation, using
//!   `tokio::process::Command`.
//! - [`broker`] sequences write → run → read for one request.
//! - [`backend`] provides the `SchedulerBackend` trait the pipeline uses, so
//!   tests can replace the broker with a fake implementation.

pub mod artifacts;
pub mod backend;
pub mod broker;
pub mod startup;
pub mod worker;

pub use artifacts::ArtifactPair;
pub use backend::{BackendFuture, SchedulerBackend};
pub use broker::ExecutionBroker;
pub use startup::prepare_broker;

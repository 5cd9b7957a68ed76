// src/exec/backend.rs

//! Pluggable scheduler backend abstraction.
//!
//! The request pipeline talks to a `SchedulerBackend` instead of the broker
//! directly, so tests can substitute a fake that never spawns a process.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::errors::Result;
use crate::protocol::backend::BackendTask;

/// Boxed future returned by [`SchedulerBackend::schedule`].
pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Value>>> + Send + 'a>>;

/// Runs one translated task list through the scheduler.
///
/// Production code uses [`super::ExecutionBroker`].
pub trait SchedulerBackend: Send + Sync {
    /// Hand `tasks` to one scheduler run and return its raw result list.
    ///
    /// Implementations must stop work and return promptly once `cancel`
    /// fires.
    fn schedule(&self, tasks: Vec<BackendTask>, cancel: CancellationToken) -> BackendFuture<'_>;
}

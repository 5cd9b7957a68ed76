// src/protocol/mod.rs

//! Wire types on both sides of the bridge.
//!
//! - [`request`] / [`response`] are the HTTP-facing schema.
//! - [`backend`] is the task-descriptor schema consumed by the scheduler
//!   executable.
//! - [`validate`] enforces request invariants before anything runs.

pub mod backend;
pub mod request;
pub mod response;
pub mod validate;

pub use backend::{BackendTask, ChildRecord, ParentRecord, TaskDefaults};
pub use request::{Core, Dag, DagEdge, DagNode, Resources, ScheduleRequest};
pub use response::{ScheduleResponse, ScheduledInput, ScheduledOutput, ScheduledTask};
pub use validate::{parse_request, validate_request};

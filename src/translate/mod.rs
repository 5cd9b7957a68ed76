// src/translate/mod.rs

//! Pure schema translation between the request DAG and the scheduler.
//!
//! - [`forward`]: DAG → backend task descriptors.
//! - [`backward`]: backend result list → normalized schedule.

pub mod backward;
pub mod forward;

pub use backward::{backend_results_to_schedule, DecodeIssue};
pub use forward::{channel_name, dag_to_backend_tasks};

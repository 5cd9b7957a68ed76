// src/protocol/response.rs

//! Outbound schedule response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub schedule: Vec<ScheduledTask>,
}

/// One entry of the normalized schedule.
///
/// `core_id` and `start_cycle` are always `0`: the backend does not report
/// placement or timing yet, so they must not be read as real decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub task_id: String,
    pub core_id: u32,
    pub start_cycle: u64,
    pub inputs: Vec<ScheduledInput>,
    pub outputs: Vec<ScheduledOutput>,
    /// Decode issues hit while reading this task's backend record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInput {
    pub source_variable: String,
    pub dest_addr: u64,
    pub size: u64,
}

/// Produced value. The backend exposes no output detail, so schedules never
/// contain these yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledOutput {
    pub source_addr: u64,
    pub size: u64,
    pub dest_variable: String,
}

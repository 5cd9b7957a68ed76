// src/protocol/backend.rs

//! Task descriptors in the schema read by the scheduler executable.
//!
//! Field names are dictated by the backend, hence the mix of camelCase and
//! snake_case in the serialized form.

use serde::{Deserialize, Serialize};

/// Placeholder values for descriptor fields the input DAG has no source for.
///
/// The bridge never interprets these; they exist only because the backend
/// requires them. Overridable through `[task_defaults]` in the config file.
///
/// | field | default |
/// |---|---|
/// | `computation_cost` | 100 |
/// | `spm_size` | 1024 |
/// | `num_lane` | 4 |
/// | `has_bitalu` / `has_serdiv` / `has_complexunit` | 0 |
/// | `text_offset` / `data_offset` | `"0x0"` |
/// | `total_length` / `text_length` / `data_length` | 0 |
/// | `hardwareinfo` / `hash` | `"0x0"` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDefaults {
    pub computation_cost: u64,
    pub spm_size: u64,
    pub num_lane: u32,
    pub has_bitalu: u8,
    pub has_serdiv: u8,
    pub has_complexunit: u8,
    pub text_offset: String,
    pub data_offset: String,
    pub total_length: u64,
    pub text_length: u64,
    pub data_length: u64,
    pub hardwareinfo: String,
    pub hash: String,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            computation_cost: 100,
            spm_size: 1024,
            num_lane: 4,
            has_bitalu: 0,
            has_serdiv: 0,
            has_complexunit: 0,
            text_offset: "0x0".to_string(),
            data_offset: "0x0".to_string(),
            total_length: 0,
            text_length: 0,
            data_length: 0,
            hardwareinfo: "0x0".to_string(),
            hash: "0x0".to_string(),
        }
    }
}

/// One backend task descriptor; one per DAG node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTask {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "computationCost")]
    pub computation_cost: u64,
    pub spm_size: u64,
    pub num_lane: u32,
    pub has_bitalu: u8,
    pub has_serdiv: u8,
    pub has_complexunit: u8,
    pub text_offset: String,
    pub data_offset: String,
    pub total_length: u64,
    pub text_length: u64,
    pub data_length: u64,
    /// Number of outgoing edges (== `child_tasks.len()`).
    pub output_num: usize,
    pub hardwareinfo: String,
    pub hash: String,
    #[serde(rename = "parentTasks")]
    pub parent_tasks: Vec<ParentRecord>,
    #[serde(rename = "childTasks")]
    pub child_tasks: Vec<ChildRecord>,
    #[serde(rename = "global_Input")]
    pub global_input: Vec<serde_json::Value>,
    #[serde(rename = "para_Input")]
    pub para_input: Vec<serde_json::Value>,
    pub return_output: Vec<serde_json::Value>,
}

impl BackendTask {
    /// Descriptor for `task_id` with placeholders from `defaults` and no
    /// links yet.
    pub fn with_defaults(task_id: impl Into<String>, defaults: &TaskDefaults) -> Self {
        Self {
            task_id: task_id.into(),
            computation_cost: defaults.computation_cost,
            spm_size: defaults.spm_size,
            num_lane: defaults.num_lane,
            has_bitalu: defaults.has_bitalu,
            has_serdiv: defaults.has_serdiv,
            has_complexunit: defaults.has_complexunit,
            text_offset: defaults.text_offset.clone(),
            data_offset: defaults.data_offset.clone(),
            total_length: defaults.total_length,
            text_length: defaults.text_length,
            data_length: defaults.data_length,
            output_num: 0,
            hardwareinfo: defaults.hardwareinfo.clone(),
            hash: defaults.hash.clone(),
            parent_tasks: Vec::new(),
            child_tasks: Vec::new(),
            global_input: Vec::new(),
            para_input: Vec::new(),
            return_output: Vec::new(),
        }
    }
}

/// Link to a producer, stored on the consuming task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRecord {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "outputIndex")]
    pub output_index: u32,
    #[serde(rename = "outputVar")]
    pub output_var: String,
    pub concat_value: u32,
    pub dest_address: String,
}

impl ParentRecord {
    pub fn new(producer: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            task_id: producer.into(),
            output_index: 0,
            output_var: channel.into(),
            concat_value: 0,
            dest_address: "null".to_string(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.output_var
    }
}

/// Link to a consumer, stored on the producing task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "inputIndex")]
    pub input_index: u32,
    #[serde(rename = "inputVar")]
    pub input_var: String,
    pub concat_value: u32,
}

impl ChildRecord {
    pub fn new(consumer: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            task_id: consumer.into(),
            input_index: 0,
            input_var: channel.into(),
            concat_value: 0,
        }
    }

    pub fn channel(&self) -> &str {
        &self.input_var
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_backend_field_names() {
        let mut task = BackendTask::with_defaults("A", &TaskDefaults::default());
        task.child_tasks.push(ChildRecord::new("B", "data_from_A_to_B"));
        task.output_num = 1;

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["taskId"], "A");
        assert_eq!(value["computationCost"], 100);
        assert_eq!(value["spm_size"], 1024);
        assert_eq!(value["num_lane"], 4);
        assert_eq!(value["text_offset"], "0x0");
        assert_eq!(value["output_num"], 1);
        assert_eq!(value["global_Input"], json!([]));
        assert_eq!(value["para_Input"], json!([]));
        assert_eq!(value["return_output"], json!([]));
        assert_eq!(
            value["childTasks"][0],
            json!({
                "taskId": "B",
                "inputIndex": 0,
                "inputVar": "data_from_A_to_B",
                "concat_value": 0
            })
        );
    }

    #[test]
    fn parent_record_carries_null_dest_address() {
        let value = serde_json::to_value(ParentRecord::new("A", "c")).unwrap();
        assert_eq!(
            value,
            json!({
                "taskId": "A",
                "outputIndex": 0,
                "outputVar": "c",
                "concat_value": 0,
                "dest_address": "null"
            })
        );
    }

    #[test]
    fn partial_defaults_table_keeps_remaining_values() {
        let defaults: TaskDefaults = toml::from_str("computation_cost = 7").unwrap();
        assert_eq!(defaults.computation_cost, 7);
        assert_eq!(defaults.spm_size, 1024);
        assert_eq!(defaults.hash, "0x0");
    }
}

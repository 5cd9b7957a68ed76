// src/translate/backward.rs

//! Backend result list → normalized schedule.
//!
//! The result list is heterogeneous: task records carry `current_taskId`,
//! anything else (e.g. a trailing summary object) is skipped. Each field is
//! decoded on its own; a field that cannot be decoded falls back to a fixed
//! default and leaves a [`DecodeIssue`] in the task's warnings.

use std::fmt;
use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::protocol::response::{ScheduleResponse, ScheduledInput, ScheduledTask};

/// Field marking an element as a task record.
pub const TASK_IDENTITY_FIELD: &str = "current_taskId";
/// Optional human-readable task id; preferred over the numeric identity.
pub const DISPLAY_NAME_FIELD: &str = "debug_task_name";
pub const INPUTS_FIELD: &str = "all_input";
pub const VARNAME_FIELD: &str = "varname";
pub const DEST_ADDRESS_FIELD: &str = "dest_address";

pub const UNKNOWN_VARIABLE: &str = "unknown_var";
/// Input size placeholder. The backend does not report sizes.
pub const PLACEHOLDER_INPUT_SIZE: u64 = 4096;

/// A field that could not be decoded and was defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    MissingField {
        field: &'static str,
    },
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    MalformedHex {
        field: &'static str,
        value: String,
    },
    /// Well-formed hex that does not fit in 64 bits.
    OutOfRange {
        field: &'static str,
        value: String,
    },
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeIssue::MissingField { field } => write!(f, "missing_field: {field}"),
            DecodeIssue::WrongType { field, expected } => {
                write!(f, "wrong_type: {field} (expected {expected})")
            }
            DecodeIssue::MalformedHex { field, value } => {
                write!(f, "malformed_hex: {field} = {value:?}")
            }
            DecodeIssue::OutOfRange { field, value } => {
                write!(f, "out_of_range: {field} = {value:?} (exceeds 64 bits)")
            }
        }
    }
}

/// Why hex text could not be turned into an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexError {
    Malformed,
    OutOfRange,
}

/// Parse hexadecimal text such as `"0x10"`, `"0X1f"` or `"ff"`.
pub fn parse_hex_address(text: &str) -> Result<u64, HexError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HexError::Malformed);
    }
    u64::from_str_radix(digits, 16).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => HexError::OutOfRange,
        _ => HexError::Malformed,
    })
}

/// Decode a consumed value's destination address.
pub fn decode_dest_addr(entry: &Map<String, Value>) -> Result<u64, DecodeIssue> {
    match entry.get(DEST_ADDRESS_FIELD) {
        None => Err(DecodeIssue::MissingField {
            field: DEST_ADDRESS_FIELD,
        }),
        Some(Value::String(text)) => {
            parse_hex_address(text).map_err(|e| match e {
                HexError::Malformed => DecodeIssue::MalformedHex {
                    field: DEST_ADDRESS_FIELD,
                    value: text.clone(),
                },
                HexError::OutOfRange => DecodeIssue::OutOfRange {
                    field: DEST_ADDRESS_FIELD,
                    value: text.clone(),
                },
            })
        }
        Some(_) => Err(DecodeIssue::WrongType {
            field: DEST_ADDRESS_FIELD,
            expected: "hex string",
        }),
    }
}

fn decode_varname(entry: &Map<String, Value>) -> Result<String, DecodeIssue> {
    match entry.get(VARNAME_FIELD) {
        None => Err(DecodeIssue::MissingField {
            field: VARNAME_FIELD,
        }),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(_) => Err(DecodeIssue::WrongType {
            field: VARNAME_FIELD,
            expected: "string",
        }),
    }
}

fn render_identity(identity: &Value) -> String {
    match identity {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_task_id(record: &Map<String, Value>, identity: &Value) -> Result<String, DecodeIssue> {
    match record.get(DISPLAY_NAME_FIELD) {
        None => Ok(render_identity(identity)),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(_) => Err(DecodeIssue::WrongType {
            field: DISPLAY_NAME_FIELD,
            expected: "string",
        }),
    }
}

fn decode_inputs(record: &Map<String, Value>, warnings: &mut Vec<DecodeIssue>) -> Vec<ScheduledInput> {
    let entries = match record.get(INPUTS_FIELD) {
        None => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            warnings.push(DecodeIssue::WrongType {
                field: INPUTS_FIELD,
                expected: "array",
            });
            return Vec::new();
        }
    };

    let mut inputs = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(entry) = entry.as_object() else {
            warnings.push(DecodeIssue::WrongType {
                field: INPUTS_FIELD,
                expected: "array of objects",
            });
            continue;
        };

        let source_variable = decode_varname(entry).unwrap_or_else(|issue| {
            warnings.push(issue);
            UNKNOWN_VARIABLE.to_string()
        });
        let dest_addr = decode_dest_addr(entry).unwrap_or_else(|issue| {
            warnings.push(issue);
            0
        });

        inputs.push(ScheduledInput {
            source_variable,
            dest_addr,
            size: PLACEHOLDER_INPUT_SIZE,
        });
    }
    inputs
}

/// Decode one element of the result list; `None` if it is not a task record.
pub fn decode_task_record(element: &Value) -> Option<(ScheduledTask, Vec<DecodeIssue>)> {
    let record = element.as_object()?;
    let identity = record.get(TASK_IDENTITY_FIELD)?;

    let mut issues = Vec::new();
    let task_id = decode_task_id(record, identity).unwrap_or_else(|issue| {
        issues.push(issue);
        render_identity(identity)
    });
    let inputs = decode_inputs(record, &mut issues);

    let task = ScheduledTask {
        task_id,
        core_id: 0,
        start_cycle: 0,
        inputs,
        outputs: Vec::new(),
        warnings: issues.iter().map(ToString::to_string).collect(),
    };
    Some((task, issues))
}

/// Translate the backend's result list, keeping its order.
pub fn backend_results_to_schedule(results: &[Value]) -> ScheduleResponse {
    let schedule = results
        .iter()
        .filter_map(decode_task_record)
        .map(|(task, issues)| {
            for issue in &issues {
                tracing::warn!(task = %task.task_id, %issue, "defaulted backend result field");
            }
            task
        })
        .collect();

    ScheduleResponse { schedule }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(value: Value) -> Vec<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_results_give_empty_schedule() {
        assert!(backend_results_to_schedule(&[]).schedule.is_empty());
    }

    #[test]
    fn hex_addresses() {
        assert_eq!(parse_hex_address("0x10"), Ok(16));
        assert_eq!(parse_hex_address("0XfF"), Ok(255));
        assert_eq!(parse_hex_address(" 20 "), Ok(32));
        assert_eq!(parse_hex_address("0xffffffffffffffff"), Ok(u64::MAX));
        assert_eq!(parse_hex_address("xyz"), Err(HexError::Malformed));
        assert_eq!(parse_hex_address("0x"), Err(HexError::Malformed));
        assert_eq!(parse_hex_address("+10"), Err(HexError::Malformed));
        assert_eq!(parse_hex_address("null"), Err(HexError::Malformed));
        assert_eq!(parse_hex_address(""), Err(HexError::Malformed));
        assert_eq!(parse_hex_address("0x1ffffffffffffffff"), Err(HexError::OutOfRange));
    }

    #[test]
    fn dest_addr_defaults_to_zero_with_named_issue() {
        let schedule = backend_results_to_schedule(&results(json!([{
            "current_taskId": 0,
            "all_input": [
                {"varname": "a", "dest_address": "0x10"},
                {"varname": "b", "dest_address": "xyz"},
                {"varname": "c"},
                {"varname": "d", "dest_address": 16},
                {"varname": "e", "dest_address": "0x1ffffffffffffffff"}
            ]
        }])));

        let task = &schedule.schedule[0];
        let addrs: Vec<_> = task.inputs.iter().map(|i| i.dest_addr).collect();
        assert_eq!(addrs, [16, 0, 0, 0, 0]);
        assert!(task.inputs.iter().all(|i| i.size == PLACEHOLDER_INPUT_SIZE));
        assert_eq!(
            task.warnings,
            [
                "malformed_hex: dest_address = \"xyz\"",
                "missing_field: dest_address",
                "wrong_type: dest_address (expected hex string)",
                "out_of_range: dest_address = \"0x1ffffffffffffffff\" (exceeds 64 bits)",
            ]
        );
    }

    #[test]
    fn trailing_summary_object_is_skipped() {
        let schedule = backend_results_to_schedule(&results(json!([
            {"current_taskId": 3, "debug_task_name": "load", "all_input": []},
            {"return_output": [{"name": "out"}]}
        ])));
        assert_eq!(schedule.schedule.len(), 1);
        assert_eq!(schedule.schedule[0].task_id, "load");
        assert!(schedule.schedule[0].warnings.is_empty());
    }

    #[test]
    fn numeric_identity_used_without_display_name() {
        let schedule = backend_results_to_schedule(&results(json!([
            {"current_taskId": 7},
            {"current_taskId": "8"}
        ])));
        let ids: Vec<_> = schedule.schedule.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(ids, ["7", "8"]);
        assert!(schedule.schedule.iter().all(|t| t.core_id == 0 && t.start_cycle == 0));
        assert!(schedule.schedule.iter().all(|t| t.outputs.is_empty()));
    }

    #[test]
    fn missing_varname_uses_placeholder() {
        let schedule = backend_results_to_schedule(&results(json!([
            {"current_taskId": 1, "all_input": [{"dest_address": "0x4"}, 5]}
        ])));
        let task = &schedule.schedule[0];
        assert_eq!(task.inputs.len(), 1);
        assert_eq!(task.inputs[0].source_variable, UNKNOWN_VARIABLE);
        assert_eq!(task.inputs[0].dest_addr, 4);
        assert_eq!(task.warnings.len(), 2);
    }

    #[test]
    fn non_array_inputs_are_reported() {
        let (task, issues) =
            decode_task_record(&json!({"current_taskId": 1, "all_input": "oops"})).unwrap();
        assert!(task.inputs.is_empty());
        assert_eq!(
            issues,
            [DecodeIssue::WrongType {
                field: INPUTS_FIELD,
                expected: "array"
            }]
        );
    }

    #[test]
    fn non_string_display_name_falls_back_to_identity() {
        let (task, issues) =
            decode_task_record(&json!({"current_taskId": 2, "debug_task_name": 9})).unwrap();
        assert_eq!(task.task_id, "2");
        assert_eq!(issues.len(), 1);
    }
}

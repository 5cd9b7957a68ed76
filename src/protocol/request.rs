// src/protocol/request.rs

//! Inbound schedule request.
//!
//! ```json
//! {
//!   "dag": {
//!     "nodes": [{"id": "A", "name": "load", "sourceFile": "load.c"}],
//!     "edges": [{"fromNode": "A", "toNode": "B", "dataSize": 100}]
//!   },
//!   "resources": {"cores": [{"id": 0, "type": "riscv"}], "memorySizeKb": 512}
//! }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub dag: Dag,
    pub resources: Resources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dag {
    pub nodes: Vec<DagNode>,
    pub edges: Vec<DagEdge>,
}

/// Input graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagNode {
    pub id: String,
    pub name: String,
    pub source_file: String,
}

/// Data dependency `from_node -> to_node`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagEdge {
    pub from_node: String,
    pub to_node: String,
    /// Bytes transferred along the edge.
    pub data_size: u64,
}

/// Hardware description. Carried through, not consumed by the translators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub cores: Vec<Core>,
    pub memory_size_kb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Core {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

#![allow(dead_code)]

use schedbridge::protocol::request::{Core, Dag, DagEdge, DagNode, Resources, ScheduleRequest};

/// Builder for `ScheduleRequest` to simplify test setup.
///
/// Starts with one core and 1 MiB of memory.
pub struct ScheduleRequestBuilder {
    request: ScheduleRequest,
}

impl ScheduleRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: ScheduleRequest {
                dag: Dag::default(),
                resources: Resources {
                    cores: vec![Core {
                        id: 0,
                        kind: "riscv".to_string(),
                    }],
                    memory_size_kb: 1024,
                },
            },
        }
    }

    /// Add a node named after its id, with source file `<id>.c`.
    pub fn node(mut self, id: &str) -> Self {
        self.request.dag.nodes.push(DagNode {
            id: id.to_string(),
            name: id.to_lowercase(),
            source_file: format!("{id}.c"),
        });
        self
    }

    pub fn nodes(self, ids: &[&str]) -> Self {
        ids.iter().fold(self, |builder, id| builder.node(id))
    }

    pub fn edge(mut self, from: &str, to: &str, data_size: u64) -> Self {
        self.request.dag.edges.push(DagEdge {
            from_node: from.to_string(),
            to_node: to.to_string(),
            data_size,
        });
        self
    }

    pub fn build(self) -> ScheduleRequest {
        self.request
    }

    pub fn to_json(self) -> String {
        serde_json::to_string(&self.request).expect("request serializes")
    }
}

impl Default for ScheduleRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

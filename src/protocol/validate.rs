// src/protocol/validate.rs

//! Request validation.
//!
//! Everything here runs before any artifact is written or any process is
//! spawned; a rejected request never reaches the scheduler.

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{BridgeError, Result};
use crate::protocol::request::ScheduleRequest;

/// Decode a request body.
///
/// Malformed JSON and missing or mistyped fields are reported as
/// [`BridgeError::Validation`] so callers see one error shape.
pub fn parse_request(body: &[u8]) -> Result<ScheduleRequest> {
    serde_json::from_slice(body)
        .map_err(|e| BridgeError::Validation(format!("malformed schedule request: {e}")))
}

/// Check graph and resource invariants of a decoded request.
pub fn validate_request(req: &ScheduleRequest) -> Result<()> {
    let node_ids = validate_nodes(req)?;
    validate_edges(req, &node_ids)?;
    validate_acyclic(req)?;
    validate_resources(req)?;
    Ok(())
}

fn validate_nodes(req: &ScheduleRequest) -> Result<HashSet<&str>> {
    let mut ids = HashSet::with_capacity(req.dag.nodes.len());
    for node in &req.dag.nodes {
        if node.id.trim().is_empty() {
            return Err(BridgeError::Validation(
                "node id must not be empty".to_string(),
            ));
        }
        if !ids.insert(node.id.as_str()) {
            return Err(BridgeError::Validation(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
    }
    Ok(ids)
}

fn validate_edges(req: &ScheduleRequest, node_ids: &HashSet<&str>) -> Result<()> {
    for edge in &req.dag.edges {
        for endpoint in [&edge.from_node, &edge.to_node] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(BridgeError::Validation(format!(
                    "edge '{}' -> '{}' references unknown node '{}'",
                    edge.from_node, edge.to_node, endpoint
                )));
            }
        }
        if edge.from_node == edge.to_node {
            return Err(BridgeError::Validation(format!(
                "node '{}' cannot depend on itself",
                edge.from_node
            )));
        }
    }
    Ok(())
}

fn validate_acyclic(req: &ScheduleRequest) -> Result<()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for node in &req.dag.nodes {
        graph.add_node(node.id.as_str());
    }
    for edge in &req.dag.edges {
        graph.add_edge(edge.from_node.as_str(), edge.to_node.as_str(), ());
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(BridgeError::Validation(format!(
            "cycle detected in task DAG involving node '{}'",
            cycle.node_id()
        ))),
    }
}

fn validate_resources(req: &ScheduleRequest) -> Result<()> {
    let mut seen = HashSet::new();
    for core in &req.resources.cores {
        if !seen.insert(core.id) {
            return Err(BridgeError::Validation(format!(
                "duplicate core id {}",
                core.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> ScheduleRequest {
        serde_json::from_value(value).unwrap()
    }

    fn expect_validation(result: Result<()>, needle: &str) {
        match result {
            Err(BridgeError::Validation(msg)) => {
                assert!(msg.contains(needle), "message '{msg}' lacks '{needle}'")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn nodes(ids: &[&str]) -> serde_json::Value {
        ids.iter()
            .map(|id| json!({"id": id, "name": id, "sourceFile": format!("{id}.c")}))
            .collect()
    }

    fn resources() -> serde_json::Value {
        json!({"cores": [{"id": 0, "type": "riscv"}], "memorySizeKb": 64})
    }

    #[test]
    fn accepts_simple_chain() {
        let req = request(json!({
            "dag": {
                "nodes": nodes(&["A", "B", "C"]),
                "edges": [
                    {"fromNode": "A", "toNode": "B", "dataSize": 1},
                    {"fromNode": "B", "toNode": "C", "dataSize": 1}
                ]
            },
            "resources": resources()
        }));
        validate_request(&req).unwrap();
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let req = request(json!({
            "dag": {"nodes": nodes(&["A", "A"]), "edges": []},
            "resources": resources()
        }));
        expect_validation(validate_request(&req), "duplicate node id 'A'");
    }

    #[test]
    fn rejects_unknown_edge_endpoint() {
        let req = request(json!({
            "dag": {
                "nodes": nodes(&["A"]),
                "edges": [{"fromNode": "A", "toNode": "Ghost", "dataSize": 1}]
            },
            "resources": resources()
        }));
        expect_validation(validate_request(&req), "unknown node 'Ghost'");
    }

    #[test]
    fn rejects_cycles_and_self_loops() {
        let cyclic = request(json!({
            "dag": {
                "nodes": nodes(&["A", "B"]),
                "edges": [
                    {"fromNode": "A", "toNode": "B", "dataSize": 1},
                    {"fromNode": "B", "toNode": "A", "dataSize": 1}
                ]
            },
            "resources": resources()
        }));
        expect_validation(validate_request(&cyclic), "cycle detected");

        let self_loop = request(json!({
            "dag": {
                "nodes": nodes(&["A"]),
                "edges": [{"fromNode": "A", "toNode": "A", "dataSize": 1}]
            },
            "resources": resources()
        }));
        expect_validation(validate_request(&self_loop), "cannot depend on itself");
    }

    #[test]
    fn rejects_duplicate_core_ids() {
        let req = request(json!({
            "dag": {"nodes": [], "edges": []},
            "resources": {"cores": [{"id": 1, "type": "a"}, {"id": 1, "type": "b"}], "memorySizeKb": 1}
        }));
        expect_validation(validate_request(&req), "duplicate core id 1");
    }

    #[test]
    fn missing_field_is_a_validation_error() {
        let body = br#"{"dag": {"nodes": [{"id": "A", "name": "a"}], "edges": []}, "resources": {"cores": [], "memorySizeKb": 1}}"#;
        match parse_request(body) {
            Err(BridgeError::Validation(msg)) => assert!(msg.contains("sourceFile")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

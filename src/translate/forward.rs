// src/translate/forward.rs

//! DAG → backend task list.
//!
//! Pure: no IO, no shared state. Producer and consumer sides of an edge are
//! linked only through [`channel_name`], which both sides derive from the
//! same ordered node pair.

use std::collections::HashMap;

use crate::protocol::backend::{BackendTask, ChildRecord, ParentRecord, TaskDefaults};
use crate::protocol::request::Dag;

/// Channel name for the edge `from -> to`.
///
/// Two edges with the same ordered pair yield the same name; such requests
/// are passed through as-is.
pub fn channel_name(from: &str, to: &str) -> String {
    format!("data_from_{from}_to_{to}")
}

#[derive(Default)]
struct Links {
    parents: Vec<ParentRecord>,
    children: Vec<ChildRecord>,
}

/// Translate a validated DAG into backend task descriptors.
///
/// Output order follows `dag.nodes`; record order within a task follows
/// `dag.edges`. Edges naming unknown nodes are skipped (validation rejects
/// them before this point).
pub fn dag_to_backend_tasks(dag: &Dag, defaults: &TaskDefaults) -> Vec<BackendTask> {
    let mut links: HashMap<&str, Links> = dag
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), Links::default()))
        .collect();

    for edge in &dag.edges {
        let from = edge.from_node.as_str();
        let to = edge.to_node.as_str();
        if !(links.contains_key(from) && links.contains_key(to)) {
            continue;
        }
        let channel = channel_name(from, to);

        if let Some(consumer) = links.get_mut(to) {
            consumer.parents.push(ParentRecord::new(from, channel.clone()));
        }
        if let Some(producer) = links.get_mut(from) {
            producer.children.push(ChildRecord::new(to, channel));
        }
    }

    dag.nodes
        .iter()
        .map(|node| {
            let node_links = links.remove(node.id.as_str()).unwrap_or_default();
            let mut task = BackendTask::with_defaults(&node.id, defaults);
            task.output_num = node_links.children.len();
            task.parent_tasks = node_links.parents;
            task.child_tasks = node_links.children;
            task
        })
        .collect()
}

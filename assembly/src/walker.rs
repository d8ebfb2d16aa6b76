use crate::registry::{LinkRegistry, NodeRegistry};
use ito_core::model::{EntityEdge, EntityNode, GraphLink, GraphNode, RawValue};

enum Visit<'a> {
    Value(&'a RawValue),
    Node(&'a EntityNode),
    Edge(&'a EntityEdge),
}

/// Registers every node and relationship reachable from `value`.
///
/// The walk is depth-first and left-to-right: path nodes before path edges,
/// an edge before its inline endpoints, sequence elements and mapping values
/// in order. A work stack replaces recursion, so nesting depth is unbounded.
pub fn extract(value: &RawValue, nodes: &mut NodeRegistry, links: &mut LinkRegistry) {
    let mut stack = vec![Visit::Value(value)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Node(node) => {
                nodes.insert_if_absent(&node.identity, || GraphNode::from_entity(node));
            }
            Visit::Edge(edge) => {
                let is_new = links.insert_if_absent(&edge.identity, || GraphLink::from_entity(edge));
                if !is_new {
                    continue;
                }
                // Pushed in reverse so the start node is visited first.
                if let Some(end) = edge.end_node.as_deref() {
                    stack.push(Visit::Node(end));
                }
                if let Some(start) = edge.start_node.as_deref() {
                    stack.push(Visit::Node(start));
                }
            }
            Visit::Value(value) => match value {
                RawValue::Null | RawValue::Scalar(_) => {}
                RawValue::Node(node) => stack.push(Visit::Node(node)),
                RawValue::Edge(edge) => stack.push(Visit::Edge(edge)),
                RawValue::Path(path) => {
                    stack.extend(path.edges.iter().rev().map(Visit::Edge));
                    stack.extend(path.nodes.iter().rev().map(Visit::Node));
                }
                RawValue::Sequence(items) => {
                    stack.extend(items.iter().rev().map(Visit::Value));
                }
                RawValue::Mapping(entries) => {
                    stack.extend(entries.values().rev().map(Visit::Value));
                }
            },
        }
    }
}

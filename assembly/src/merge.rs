use crate::registry::{LinkRegistry, NodeRegistry};
use ito_core::model::Subgraph;
use tracing::debug;

/// Single subgraph holding everything registered, or `None` when nothing was.
///
/// For results already known to form one traversal (paths, neighborhoods):
/// no partitioning and no link filtering take place.
pub fn merge_all(nodes: &NodeRegistry, links: &LinkRegistry) -> Option<Subgraph> {
    if nodes.is_empty() && links.is_empty() {
        debug!("merged assembly found no entities");
        return None;
    }

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        "assembled merged subgraph"
    );
    Some(Subgraph {
        nodes: nodes.values().cloned().collect(),
        links: links.values().cloned().collect(),
    })
}

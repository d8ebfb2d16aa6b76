use crate::partition::connected_components;
use crate::registry::{LinkRegistry, NodeRegistry};
use ito_core::model::Subgraph;
use tracing::debug;

/// Splits the registries into one subgraph per connected component, largest first.
///
/// A component keeps every link whose endpoints both belong to it; links with
/// an unregistered endpoint appear in no subgraph. Components of equal size
/// keep the order in which their first node was registered.
pub fn assemble_components(nodes: &NodeRegistry, links: &LinkRegistry) -> Vec<Subgraph> {
    let groups = connected_components(nodes, links);

    let mut component_of = vec![0usize; nodes.len()];
    for (component, members) in groups.iter().enumerate() {
        for &member in members {
            component_of[member] = component;
        }
    }

    let mut subgraphs: Vec<Subgraph> = groups
        .iter()
        .map(|members| Subgraph {
            nodes: members
                .iter()
                .filter_map(|&index| nodes.get_index(index).cloned())
                .collect(),
            links: Vec::new(),
        })
        .collect();

    let mut dangling = 0usize;
    for link in links.values() {
        let (Some(source), Some(target)) = (
            nodes.index_of(link.source.as_str()),
            nodes.index_of(link.target.as_str()),
        ) else {
            dangling += 1;
            continue;
        };
        let component = component_of[source];
        if component_of[target] == component {
            subgraphs[component].links.push(link.clone());
        }
    }

    // Stable: equal sizes keep discovery order.
    subgraphs.sort_by(|a, b| b.nodes.len().cmp(&a.nodes.len()));

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        dangling,
        components = subgraphs.len(),
        "assembled connected components"
    );
    subgraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::extract;
    use ito_core::model::{EntityEdge, EntityNode, RawValue};

    #[test]
    fn test_self_loop_stays_in_its_singleton() {
        let a = EntityNode::new("n1", ["法人"]);
        let value = RawValue::Edge(EntityEdge::between("r1", "同名人物", &a, &a));
        let mut nodes = NodeRegistry::new();
        let mut links = LinkRegistry::new();
        extract(&value, &mut nodes, &mut links);

        let components = assemble_components(&nodes, &links);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].nodes.len(), 1);
        assert_eq!(components[0].links.len(), 1);
    }

    #[test]
    fn test_parallel_links_are_all_kept() {
        let a = EntityNode::new("n1", ["法人"]);
        let b = EntityNode::new("n2", ["住所"]);
        let value = RawValue::Sequence(vec![
            RawValue::Edge(EntityEdge::between("r1", "所在地", &a, &b)),
            RawValue::Edge(EntityEdge::between("r2", "登録住所", &b, &a)),
        ]);
        let mut nodes = NodeRegistry::new();
        let mut links = LinkRegistry::new();
        extract(&value, &mut nodes, &mut links);

        let components = assemble_components(&nodes, &links);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].links.len(), 2);
    }
}

use std::collections::{HashMap, HashSet, VecDeque};

use assembly::GraphCollector;
use ito_core::model::{EntityEdge, EntityNode, RawValue};
use proptest::prelude::*;

// Endpoints at or beyond `node_count` are never registered, so those edges dangle.
fn build(node_count: usize, edges: &[(usize, usize)]) -> Vec<RawValue> {
    let mut values: Vec<RawValue> = (0..node_count)
        .map(|index| RawValue::Node(EntityNode::new(format!("n{index}"), ["法人"])))
        .collect();
    values.extend(edges.iter().enumerate().map(|(index, (source, target))| {
        RawValue::Edge(EntityEdge::new(
            format!("r{index}"),
            "役員",
            format!("n{source}"),
            format!("n{target}"),
        ))
    }));
    values
}

fn reachable_sets(node_count: usize, edges: &[(usize, usize)]) -> HashMap<usize, usize> {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(source, target) in edges {
        if source < node_count && target < node_count {
            adjacency.entry(source).or_default().push(target);
            adjacency.entry(target).or_default().push(source);
        }
    }

    let mut component = HashMap::new();
    for start in 0..node_count {
        if component.contains_key(&start) {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        component.insert(start, start);
        while let Some(current) = queue.pop_front() {
            for &next in adjacency.get(&current).into_iter().flatten() {
                if !component.contains_key(&next) {
                    component.insert(next, start);
                    queue.push_back(next);
                }
            }
        }
    }
    component
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..24).prop_flat_map(|node_count| {
        let edges = prop::collection::vec((0..node_count + 3, 0..node_count + 3), 0..40);
        (Just(node_count), edges)
    })
}

proptest! {
    #[test]
    fn prop_repeated_extraction_is_idempotent((node_count, edges) in graph_strategy()) {
        let values = build(node_count, &edges);

        let mut once = GraphCollector::new();
        for value in &values {
            once.extract(value);
        }
        let mut twice = GraphCollector::new();
        for value in values.iter().chain(values.iter()) {
            twice.extract(value);
        }

        prop_assert_eq!(once.node_count(), node_count);
        prop_assert_eq!(once.link_count(), edges.len());
        prop_assert_eq!(twice.node_count(), once.node_count());
        prop_assert_eq!(twice.link_count(), once.link_count());
        prop_assert_eq!(twice.partition(), once.partition());
    }

    #[test]
    fn prop_partition_is_complete_disjoint_and_ordered((node_count, edges) in graph_strategy()) {
        let mut collector = GraphCollector::new();
        for value in build(node_count, &edges) {
            collector.extract(&value);
        }
        let components = collector.partition();

        let mut seen = HashSet::new();
        for component in &components {
            for node in &component.nodes {
                prop_assert!(seen.insert(node.id.to_string()), "node in two components");
            }
        }
        prop_assert_eq!(seen.len(), collector.node_count());

        for pair in components.windows(2) {
            prop_assert!(pair[0].nodes.len() >= pair[1].nodes.len());
        }
    }

    #[test]
    fn prop_links_never_leave_their_component((node_count, edges) in graph_strategy()) {
        let mut collector = GraphCollector::new();
        for value in build(node_count, &edges) {
            collector.extract(&value);
        }

        let mut assembled_links = 0usize;
        for component in collector.partition() {
            let members: HashSet<&str> = component.nodes.iter().map(|n| n.id.as_str()).collect();
            for link in &component.links {
                prop_assert!(members.contains(link.source.as_str()));
                prop_assert!(members.contains(link.target.as_str()));
            }
            assembled_links += component.links.len();
        }

        let resolvable = edges
            .iter()
            .filter(|(source, target)| *source < node_count && *target < node_count)
            .count();
        prop_assert_eq!(assembled_links, resolvable);
    }

    #[test]
    fn prop_components_match_reachability((node_count, edges) in graph_strategy()) {
        let mut collector = GraphCollector::new();
        for value in build(node_count, &edges) {
            collector.extract(&value);
        }
        let expected = reachable_sets(node_count, &edges);

        let mut component_of = HashMap::new();
        for (position, component) in collector.partition().iter().enumerate() {
            for node in &component.nodes {
                let index: usize = node.id.as_str()[1..].parse().unwrap();
                component_of.insert(index, position);
            }
        }

        for a in 0..node_count {
            for b in 0..node_count {
                let together = component_of[&a] == component_of[&b];
                let reachable = expected[&a] == expected[&b];
                prop_assert_eq!(together, reachable, "nodes {} and {}", a, b);
            }
        }
    }
}

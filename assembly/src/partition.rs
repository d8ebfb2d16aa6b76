use crate::registry::{LinkRegistry, NodeRegistry};
use indexmap::IndexMap;

/// Disjoint-set forest over dense indices, with path compression and union by size.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = index;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Merges the sets holding `a` and `b`. Returns false when they already share one.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let (large, small) = if self.size[root_a] >= self.size[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
        true
    }
}

/// Groups registered nodes into connected components.
///
/// Each group holds node registry indices in registration order; groups are
/// ordered by their first registered node. Links count only when both
/// endpoints are registered, and direction is ignored.
pub fn connected_components(nodes: &NodeRegistry, links: &LinkRegistry) -> Vec<Vec<usize>> {
    let mut sets = DisjointSet::new(nodes.len());

    for link in links.values() {
        let (Some(source), Some(target)) = (
            nodes.index_of(link.source.as_str()),
            nodes.index_of(link.target.as_str()),
        ) else {
            continue;
        };
        sets.union(source, target);
    }

    let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for index in 0..nodes.len() {
        let root = sets.find(index);
        groups.entry(root).or_default().push(index);
    }

    groups.into_values().collect()
}

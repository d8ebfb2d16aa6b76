use indexmap::IndexMap;
use ito_core::model::{GraphLink, GraphNode, Identity};

/// Identity-keyed collection that keeps the first representation it sees.
///
/// Iteration follows insertion order; entries are never updated or removed.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: IndexMap<Identity, T>,
}

pub type NodeRegistry = Registry<GraphNode>;
pub type LinkRegistry = Registry<GraphLink>;

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Inserts the built value unless `id` is already registered.
    /// `build` only runs for new identities. Returns whether it ran.
    pub fn insert_if_absent(&mut self, id: &Identity, build: impl FnOnce() -> T) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        self.entries.insert(id.clone(), build());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    /// Insertion position of `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.get_index_of(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.entries.get_index(index).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &Identity> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_values()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let mut registry: Registry<&str> = Registry::new();
        let id = Identity::from("n1");

        assert!(registry.insert_if_absent(&id, || "first"));
        assert!(!registry.insert_if_absent(&id, || "second"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("n1"), Some(&"first"));
    }

    #[test]
    fn test_builder_not_called_for_known_identity() {
        let mut registry: Registry<u32> = Registry::new();
        let id = Identity::from("n1");
        registry.insert_if_absent(&id, || 1);

        let mut called = false;
        registry.insert_if_absent(&id, || {
            called = true;
            2
        });
        assert!(!called);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut registry: Registry<usize> = Registry::new();
        for (position, id) in ["c", "a", "b", "a"].into_iter().enumerate() {
            registry.insert_if_absent(&Identity::from(id), || position);
        }

        let ids: Vec<&str> = registry.ids().map(Identity::as_str).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(registry.index_of("b"), Some(2));
        assert_eq!(registry.get_index(1), Some(&1));
    }
}

use crate::merge::merge_all;
use crate::registry::{LinkRegistry, NodeRegistry};
use crate::stream::{ResultStream, StreamError};
use crate::subgraph::assemble_components;
use crate::walker::extract;
use ito_core::model::{RawValue, Row, Subgraph};
use tracing::debug;

/// Request-scoped registries filled by walking result values.
///
/// A collector belongs to exactly one assembly. Registries only grow, so a
/// drain that is cancelled part-way leaves a consistent partial view that can
/// still be assembled.
#[derive(Debug, Clone, Default)]
pub struct GraphCollector {
    nodes: NodeRegistry,
    links: LinkRegistry,
    rows: usize,
}

impl GraphCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&mut self, value: &RawValue) {
        extract(value, &mut self.nodes, &mut self.links);
    }

    pub fn extract_row(&mut self, row: &Row) {
        for value in row.values() {
            self.extract(value);
        }
        self.rows += 1;
    }

    /// Walks every remaining row of `stream`. Returns the number of rows consumed.
    pub async fn drain<S>(&mut self, stream: &mut S) -> Result<usize, StreamError>
    where
        S: ResultStream + ?Sized,
    {
        let mut consumed = 0usize;
        while let Some(row) = stream.next_row().await? {
            self.extract_row(&row);
            consumed += 1;
        }

        debug!(
            rows = consumed,
            nodes = self.nodes.len(),
            links = self.links.len(),
            "result stream drained"
        );
        Ok(consumed)
    }

    /// One subgraph per connected component, largest first.
    pub fn partition(&self) -> Vec<Subgraph> {
        assemble_components(&self.nodes, &self.links)
    }

    /// Everything in one subgraph, or `None` when nothing was extracted.
    pub fn merge(&self) -> Option<Subgraph> {
        merge_all(&self.nodes, &self.links)
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Raw link total, dangling links included.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn rows_seen(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Drains `stream` into fresh registries and partitions the result.
pub async fn assemble_partitioned<S>(stream: &mut S) -> Result<Vec<Subgraph>, StreamError>
where
    S: ResultStream + ?Sized,
{
    let mut collector = GraphCollector::new();
    collector.drain(stream).await?;
    Ok(collector.partition())
}

/// Drains `stream` into fresh registries and merges everything into one subgraph.
/// `Ok(None)` means nothing was extracted.
pub async fn assemble_merged<S>(stream: &mut S) -> Result<Option<Subgraph>, StreamError>
where
    S: ResultStream + ?Sized,
{
    let mut collector = GraphCollector::new();
    collector.drain(stream).await?;
    Ok(collector.merge())
}

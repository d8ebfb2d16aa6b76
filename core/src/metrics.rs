use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct QueryMetrics {
    pub total_queries: u64,
    pub not_found: u64,
    pub failures: u64,
    pub latencies: VecDeque<u64>, // microseconds
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyMetrics {
    pub total_assemblies: u64,
    pub last_node_count: usize,
    pub last_link_count: usize,
    pub last_component_count: usize,
}

/// Outcome of one service operation, as seen by the metrics collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Succeeded,
    NotFound,
    Failed,
}

#[derive(Clone)]
pub struct MetricsCollector {
    state: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    query_metrics: QueryMetrics,
    assembly_metrics: AssemblyMetrics,
    max_history: usize,
}

impl MetricsCollector {
    pub fn new(max_history: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState {
                query_metrics: QueryMetrics::default(),
                assembly_metrics: AssemblyMetrics::default(),
                max_history: max_history.max(1),
            })),
        }
    }

    // Metrics stay readable even if a recording thread panicked mid-update.
    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_query(&self, latency_us: u64, outcome: QueryOutcome) {
        let mut state = self.lock();
        state.query_metrics.total_queries += 1;
        match outcome {
            QueryOutcome::Succeeded => {}
            QueryOutcome::NotFound => state.query_metrics.not_found += 1,
            QueryOutcome::Failed => state.query_metrics.failures += 1,
        }
        state.query_metrics.latencies.push_back(latency_us);
        if state.query_metrics.latencies.len() > state.max_history {
            state.query_metrics.latencies.pop_front();
        }
    }

    pub fn record_assembly(&self, nodes: usize, links: usize, components: usize) {
        let mut state = self.lock();
        state.assembly_metrics.total_assemblies += 1;
        state.assembly_metrics.last_node_count = nodes;
        state.assembly_metrics.last_link_count = links;
        state.assembly_metrics.last_component_count = components;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.lock();
        let q = &state.query_metrics;
        let a = &state.assembly_metrics;

        let mut sorted_latencies: Vec<u64> = q.latencies.iter().copied().collect();
        sorted_latencies.sort_unstable();

        MetricsSnapshot {
            total_queries: q.total_queries,
            not_found: q.not_found,
            failures: q.failures,
            p50: percentile(&sorted_latencies, 50.0),
            p95: percentile(&sorted_latencies, 95.0),
            p99: percentile(&sorted_latencies, 99.0),
            history_count: q.latencies.len(),
            total_assemblies: a.total_assemblies,
            last_node_count: a.last_node_count,
            last_link_count: a.last_link_count,
            last_component_count: a.last_component_count,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(1024)
    }
}

fn percentile(sorted: &[u64], p: f32) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((p / 100.0) * (sorted.len() as f32)).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub not_found: u64,
    pub failures: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub history_count: usize,
    pub total_assemblies: u64,
    pub last_node_count: usize,
    pub last_link_count: usize,
    pub last_component_count: usize,
}

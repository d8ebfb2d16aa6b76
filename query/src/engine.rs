use std::sync::Arc;
use std::time::{Duration, Instant};

use assembly::{GraphCollector, ResultStream, StreamError};
use ito_core::codec::encode_row;
use ito_core::config::{ApiConfig, AppConfig};
use ito_core::error::{ErrorCode, ErrorResponse, ItoError};
use ito_core::metrics::{MetricsCollector, MetricsSnapshot, QueryOutcome};
use ito_core::model::{RawValue, Row, Subgraph};
use thiserror::Error;
use tracing::{info, warn};

use crate::cypher::{
    labels_statement, property_keys_statement, relationship_types_statement, stats_statement,
    ConnectedComponentsResponse, CypherRequest, CypherResponse, SchemaResponse, StatsResponse,
};
use crate::dsl::RequestValidationError;
use crate::network::{self, NetworkRequest, RelationshipTypesResponse, ShortestPathRequest};
use crate::search::{self, LabelsResponse, NameSearch, NodeIdSearch, PropertySearch, SearchResponse};
use crate::source::{GraphSource, Statement};

const DEFAULT_METRICS_HISTORY: usize = 1024;
const AUTH_ERROR_DETAIL: &str = "Database authentication error";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid request: {0}")]
    InvalidRequest(RequestValidationError),
    #[error("{0}")]
    Forbidden(RequestValidationError),
    #[error("{0}")]
    NotFound(String),
    #[error("Query execution failed: {0}")]
    Execution(String),
}

impl QueryError {
    /// Stream failures become `Execution`; messages that may carry
    /// credentials are replaced.
    fn execution(err: StreamError) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("authentication") || lowered.contains("password") {
            return QueryError::Execution(AUTH_ERROR_DETAIL.to_string());
        }
        QueryError::Execution(message)
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::from_error(self)
    }

    fn outcome(&self) -> QueryOutcome {
        match self {
            QueryError::NotFound(_) => QueryOutcome::NotFound,
            _ => QueryOutcome::Failed,
        }
    }
}

impl From<RequestValidationError> for QueryError {
    fn from(err: RequestValidationError) -> Self {
        match err {
            RequestValidationError::ForbiddenOperation(_) => QueryError::Forbidden(err),
            other => QueryError::InvalidRequest(other),
        }
    }
}

impl ItoError for QueryError {
    fn error_code(&self) -> ErrorCode {
        match self {
            QueryError::InvalidQuery(_) | QueryError::InvalidRequest(_) => {
                ErrorCode::InvalidArgument
            }
            QueryError::Forbidden(_) => ErrorCode::PermissionDenied,
            QueryError::NotFound(_) => ErrorCode::NotFound,
            QueryError::Execution(_) => ErrorCode::Internal,
        }
    }
}

/// Read-only graph operations over a [`GraphSource`].
///
/// Every operation builds its own collector, so one service can be shared
/// across concurrent requests.
#[derive(Clone)]
pub struct GraphService {
    source: Arc<dyn GraphSource>,
    limits: ApiConfig,
    metrics: MetricsCollector,
}

impl GraphService {
    pub fn new(source: Arc<dyn GraphSource>) -> Self {
        Self {
            source,
            limits: ApiConfig::default(),
            metrics: MetricsCollector::new(DEFAULT_METRICS_HISTORY),
        }
    }

    pub fn from_config(source: Arc<dyn GraphSource>, config: &AppConfig) -> Self {
        Self::new(source).with_limits(config.api.clone())
    }

    pub fn with_limits(mut self, limits: ApiConfig) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn limits(&self) -> &ApiConfig {
        &self.limits
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Runs a user query and partitions everything it returned into
    /// connected components, largest first.
    pub async fn execute_cypher(
        &self,
        request: CypherRequest,
    ) -> Result<ConnectedComponentsResponse, QueryError> {
        let started = Instant::now();
        let result = self.execute_cypher_inner(&request).await;
        self.observe("execute_cypher", started, &result);
        result
    }

    pub async fn execute_cypher_json(
        &self,
        raw: &str,
    ) -> Result<ConnectedComponentsResponse, QueryError> {
        let request =
            CypherRequest::parse_json(raw).map_err(|e| QueryError::InvalidQuery(e.to_string()))?;
        self.execute_cypher(request).await
    }

    async fn execute_cypher_inner(
        &self,
        request: &CypherRequest,
    ) -> Result<ConnectedComponentsResponse, QueryError> {
        request.validate()?;
        let collector = self.collect(request.statement()).await?;
        let components = collector.partition();
        self.metrics.record_assembly(
            collector.node_count(),
            collector.link_count(),
            components.len(),
        );

        Ok(ConnectedComponentsResponse {
            component_count: components.len(),
            total_nodes: collector.node_count(),
            total_links: collector.link_count(),
            components,
        })
    }

    /// Runs a user query and returns its rows in wire form, unassembled.
    pub async fn execute_raw(&self, request: CypherRequest) -> Result<CypherResponse, QueryError> {
        let started = Instant::now();
        let result: Result<CypherResponse, QueryError> = async {
            request.validate()?;
            let rows = self.fetch_rows(request.statement()).await?;
            let results: Vec<_> = rows.iter().map(encode_row).collect();
            Ok(CypherResponse {
                count: results.len(),
                results,
            })
        }
        .await;
        self.observe("execute_raw", started, &result);
        result
    }

    pub async fn schema(&self) -> Result<SchemaResponse, QueryError> {
        let started = Instant::now();
        let result: Result<SchemaResponse, QueryError> = async {
            Ok(SchemaResponse {
                node_labels: self.fetch_strings(labels_statement(), "label").await?,
                relationship_types: self
                    .fetch_strings(relationship_types_statement(), "relationshipType")
                    .await?,
                property_keys: self
                    .fetch_strings(property_keys_statement(), "propertyKey")
                    .await?,
            })
        }
        .await;
        self.observe("schema", started, &result);
        result
    }

    pub async fn stats(&self) -> Result<StatsResponse, QueryError> {
        let started = Instant::now();
        let result: Result<StatsResponse, QueryError> = async {
            let rows = self.fetch_rows(stats_statement()).await?;
            let count = |column: &str| {
                rows.first()
                    .and_then(|row| match row.get(column) {
                        Some(RawValue::Scalar(scalar)) => scalar.as_i64(),
                        _ => None,
                    })
                    .unwrap_or(0)
            };
            Ok(StatsResponse {
                node_count: count("nodeCount"),
                relationship_count: count("relationshipCount"),
            })
        }
        .await;
        self.observe("stats", started, &result);
        result
    }

    /// An unknown id yields an empty response, not an error.
    pub async fn search_by_node_id(
        &self,
        request: NodeIdSearch,
    ) -> Result<SearchResponse, QueryError> {
        let started = Instant::now();
        let result: Result<SearchResponse, QueryError> = async {
            let rows = self.fetch_rows(request.statement()).await?;
            Ok(SearchResponse::from_rows(&rows))
        }
        .await;
        self.observe("search_by_node_id", started, &result);
        result
    }

    pub async fn search_by_name(&self, request: NameSearch) -> Result<SearchResponse, QueryError> {
        let started = Instant::now();
        let result: Result<SearchResponse, QueryError> = async {
            request.validate(&self.limits)?;
            let rows = self.fetch_rows(request.statement()).await?;
            Ok(SearchResponse::from_rows(&rows))
        }
        .await;
        self.observe("search_by_name", started, &result);
        result
    }

    pub async fn search_by_property(
        &self,
        request: PropertySearch,
    ) -> Result<SearchResponse, QueryError> {
        let started = Instant::now();
        let result: Result<SearchResponse, QueryError> = async {
            request.validate(&self.limits)?;
            let rows = self.fetch_rows(request.statement()).await?;
            Ok(SearchResponse::from_rows(&rows))
        }
        .await;
        self.observe("search_by_property", started, &result);
        result
    }

    pub fn labels(&self) -> LabelsResponse {
        search::labels()
    }

    pub fn relationship_types(&self) -> RelationshipTypesResponse {
        network::relationship_types()
    }

    /// Merged subgraph of every path up to `hops` away from the start node.
    pub async fn traverse(&self, request: NetworkRequest) -> Result<Subgraph, QueryError> {
        let started = Instant::now();
        let result: Result<Subgraph, QueryError> = async {
            request.validate(&self.limits)?;
            self.expand(&request, request.traverse_statement()).await
        }
        .await;
        self.observe("traverse", started, &result);
        result
    }

    /// Merged subgraph of the start node and its direct neighbors.
    pub async fn neighbors(&self, request: NetworkRequest) -> Result<Subgraph, QueryError> {
        let started = Instant::now();
        let result: Result<Subgraph, QueryError> = async {
            request.validate(&self.limits)?;
            self.expand(&request, request.neighbors_statement()).await
        }
        .await;
        self.observe("neighbors", started, &result);
        result
    }

    pub async fn shortest_path(&self, request: ShortestPathRequest) -> Result<Subgraph, QueryError> {
        let started = Instant::now();
        let result: Result<Subgraph, QueryError> = async {
            request.validate()?;
            let collector = self
                .collect(request.statement(self.limits.max_hops))
                .await?;
            self.merge_recorded(&collector).ok_or_else(|| {
                QueryError::NotFound(format!(
                    "No path found between node {} and node {}",
                    request.start_node_id, request.end_node_id
                ))
            })
        }
        .await;
        self.observe("shortest_path", started, &result);
        result
    }

    // An empty expansion still succeeds when the start node exists but has
    // no relationships.
    async fn expand(
        &self,
        request: &NetworkRequest,
        statement: Statement,
    ) -> Result<Subgraph, QueryError> {
        let collector = self.collect(statement).await?;
        if let Some(subgraph) = self.merge_recorded(&collector) {
            return Ok(subgraph);
        }

        let start = self.collect(request.start_node_statement()).await?;
        self.merge_recorded(&start).ok_or_else(|| {
            QueryError::NotFound(format!("Node with node_id {} not found", request.node_id))
        })
    }

    fn merge_recorded(&self, collector: &GraphCollector) -> Option<Subgraph> {
        let subgraph = collector.merge()?;
        self.metrics
            .record_assembly(collector.node_count(), collector.link_count(), 1);
        Some(subgraph)
    }

    /// Runs `statement`, bounded by the configured timeout.
    async fn open(&self, statement: Statement) -> Result<Box<dyn ResultStream>, QueryError> {
        let run = self.source.run(statement);
        let opened = match self.limits.query_timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(Duration::from_millis(timeout_ms), run)
                .await
                .map_err(|_| {
                    QueryError::Execution(format!("query timed out after {} ms", timeout_ms))
                })?,
            None => run.await,
        };
        opened.map_err(QueryError::execution)
    }

    /// Drains one statement's stream into a fresh collector. With a
    /// configured timeout, whatever was consumed before it fired is kept.
    async fn collect(&self, statement: Statement) -> Result<GraphCollector, QueryError> {
        let mut stream = self.open(statement).await?;
        let mut collector = GraphCollector::new();

        let drain = collector.drain(stream.as_mut());
        match self.limits.query_timeout_ms {
            Some(timeout_ms) => {
                let drained = tokio::time::timeout(Duration::from_millis(timeout_ms), drain).await;
                match drained {
                    Ok(result) => {
                        result.map_err(QueryError::execution)?;
                    }
                    Err(_) => warn!(
                        timeout_ms,
                        rows = collector.rows_seen(),
                        "result stream truncated by timeout"
                    ),
                }
            }
            None => {
                drain.await.map_err(QueryError::execution)?;
            }
        }
        Ok(collector)
    }

    /// Reads every row of one statement. A timeout keeps the rows read so far.
    async fn fetch_rows(&self, statement: Statement) -> Result<Vec<Row>, QueryError> {
        let mut stream = self.open(statement).await?;
        let mut rows = Vec::new();

        let read = read_rows(stream.as_mut(), &mut rows);
        match self.limits.query_timeout_ms {
            Some(timeout_ms) => {
                let read = tokio::time::timeout(Duration::from_millis(timeout_ms), read).await;
                match read {
                    Ok(result) => result.map_err(QueryError::execution)?,
                    Err(_) => warn!(
                        timeout_ms,
                        rows = rows.len(),
                        "result rows truncated by timeout"
                    ),
                }
            }
            None => read.await.map_err(QueryError::execution)?,
        }
        Ok(rows)
    }

    async fn fetch_strings(
        &self,
        statement: Statement,
        column: &str,
    ) -> Result<Vec<String>, QueryError> {
        let rows = self.fetch_rows(statement).await?;
        Ok(rows
            .iter()
            .filter_map(|row| match row.get(column) {
                Some(RawValue::Scalar(scalar)) => scalar.as_str().map(str::to_string),
                _ => None,
            })
            .collect())
    }

    fn observe<T>(&self, operation: &'static str, started: Instant, result: &Result<T, QueryError>) {
        let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        match result {
            Ok(_) => {
                self.metrics.record_query(latency_us, QueryOutcome::Succeeded);
                info!(operation, latency_us, "graph query completed");
            }
            Err(err) => {
                self.metrics.record_query(latency_us, err.outcome());
                warn!(
                    operation,
                    latency_us,
                    error_code = %err.error_code(),
                    error = %err,
                    "graph query failed"
                );
            }
        }
    }
}

async fn read_rows<S>(stream: &mut S, rows: &mut Vec<Row>) -> Result<(), StreamError>
where
    S: ResultStream + ?Sized,
{
    while let Some(row) = stream.next_row().await? {
        rows.push(row);
    }
    Ok(())
}

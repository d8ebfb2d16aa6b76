use ito_core::model::Subgraph;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dsl::RequestValidationError;
use crate::source::Statement;

/// Write keywords rejected in user-supplied queries.
pub const FORBIDDEN_KEYWORDS: [&str; 7] = [
    "DELETE",
    "DETACH DELETE",
    "DROP",
    "CREATE INDEX",
    "DROP INDEX",
    "CREATE CONSTRAINT",
    "DROP CONSTRAINT",
];

const READ_CLAUSES: [&str; 6] = ["MATCH", "OPTIONAL MATCH", "WITH", "UNWIND", "CALL", "RETURN"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CypherRequest {
    pub query: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl CypherRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Map::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), RequestValidationError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(RequestValidationError::EmptyQuery);
        }

        let upper = query.to_uppercase();
        let starts_with_read = READ_CLAUSES.iter().any(|clause| upper.starts_with(clause));
        for keyword in FORBIDDEN_KEYWORDS {
            if !upper.contains(keyword) {
                continue;
            }
            if !starts_with_read || upper.split_whitespace().any(|token| token == keyword) {
                return Err(RequestValidationError::ForbiddenOperation(keyword));
            }
        }
        Ok(())
    }

    pub fn statement(&self) -> Statement {
        Statement::new(self.query.clone()).with_parameters(self.parameters.clone())
    }
}

/// Partitioned result of a user query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedComponentsResponse {
    pub components: Vec<Subgraph>,
    /// Registry sizes before partitioning; dangling links are counted.
    pub total_nodes: usize,
    pub total_links: usize,
    pub component_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CypherResponse {
    pub results: Vec<Value>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SchemaResponse {
    pub node_labels: Vec<String>,
    pub relationship_types: Vec<String>,
    pub property_keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatsResponse {
    pub node_count: i64,
    pub relationship_count: i64,
}

pub(crate) fn labels_statement() -> Statement {
    Statement::new("CALL db.labels() YIELD label RETURN label")
}

pub(crate) fn relationship_types_statement() -> Statement {
    Statement::new("CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType")
}

pub(crate) fn property_keys_statement() -> Statement {
    Statement::new("CALL db.propertyKeys() YIELD propertyKey RETURN propertyKey")
}

pub(crate) fn stats_statement() -> Statement {
    Statement::new(
        "MATCH (n) WITH count(n) AS nodeCount \
         MATCH ()-[r]->() RETURN nodeCount, count(r) AS relationshipCount",
    )
}

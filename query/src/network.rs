use ito_core::config::ApiConfig;
use ito_core::schema::{NodeLabel, RelationshipType};
use serde::{Deserialize, Serialize};

use crate::dsl::{check_hops, check_limit, default_hops, default_limit, label_pattern, RequestValidationError};
use crate::source::Statement;

/// Expansion around one start node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkRequest {
    pub node_id: i64,
    #[serde(default)]
    pub label: Option<NodeLabel>,
    #[serde(default = "default_hops")]
    pub hops: u8,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl NetworkRequest {
    pub fn new(node_id: i64) -> Self {
        Self {
            node_id,
            label: None,
            hops: default_hops(),
            limit: default_limit(),
        }
    }

    /// Request carrying the configured default hops and limit.
    pub fn with_defaults(node_id: i64, limits: &ApiConfig) -> Self {
        Self {
            node_id,
            label: None,
            hops: limits.default_hops,
            limit: limits.default_limit,
        }
    }

    pub fn with_label(mut self, label: NodeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_hops(mut self, hops: u8) -> Self {
        self.hops = hops;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self, limits: &ApiConfig) -> Result<(), RequestValidationError> {
        check_hops(self.hops, limits)?;
        check_limit(self.limit, limits)
    }

    /// Paths of length `1..=hops` from the start node.
    pub fn traverse_statement(&self) -> Statement {
        Statement::new(format!(
            "MATCH path = (start{} {{node_id: $node_id}})-[*1..{}]-(connected) \
             RETURN path LIMIT $limit",
            label_pattern(self.label),
            self.hops
        ))
        .param("node_id", self.node_id)
        .param("limit", self.limit)
    }

    /// Direct neighbors only; `hops` is ignored.
    pub fn neighbors_statement(&self) -> Statement {
        Statement::new(format!(
            "MATCH path = (start{} {{node_id: $node_id}})-[]-(neighbor) \
             RETURN path LIMIT $limit",
            label_pattern(self.label)
        ))
        .param("node_id", self.node_id)
        .param("limit", self.limit)
    }

    /// Looks the start node up on its own.
    pub fn start_node_statement(&self) -> Statement {
        Statement::new(format!(
            "MATCH (start{} {{node_id: $node_id}}) RETURN start LIMIT 1",
            label_pattern(self.label)
        ))
        .param("node_id", self.node_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShortestPathRequest {
    pub start_node_id: i64,
    pub end_node_id: i64,
    /// Return every shortest path instead of one.
    #[serde(default)]
    pub all_paths: bool,
}

impl ShortestPathRequest {
    pub fn new(start_node_id: i64, end_node_id: i64) -> Self {
        Self {
            start_node_id,
            end_node_id,
            all_paths: false,
        }
    }

    pub fn all(mut self) -> Self {
        self.all_paths = true;
        self
    }

    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.start_node_id == self.end_node_id {
            return Err(RequestValidationError::SameEndpoints);
        }
        Ok(())
    }

    pub fn statement(&self, max_hops: u8) -> Statement {
        let function = if self.all_paths {
            "allShortestPaths"
        } else {
            "shortestPath"
        };
        Statement::new(format!(
            "MATCH (start {{node_id: $start_node_id}}), (end {{node_id: $end_node_id}}) \
             MATCH path = {}((start)-[*..{}]-(end)) RETURN path",
            function, max_hops
        ))
        .param("start_node_id", self.start_node_id)
        .param("end_node_id", self.end_node_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTypeInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTypesResponse {
    pub relationship_types: Vec<RelationshipTypeInfo>,
}

pub fn relationship_types() -> RelationshipTypesResponse {
    RelationshipTypesResponse {
        relationship_types: RelationshipType::ALL
            .iter()
            .map(|rel| RelationshipTypeInfo {
                name: rel.as_str().to_string(),
                description: rel.description().to_string(),
            })
            .collect(),
    }
}

use ito_core::config::ApiConfig;
use ito_core::model::{GraphNode, RawValue, Row};
use ito_core::schema::{is_searchable_property, NodeLabel};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dsl::{check_limit, default_limit, label_pattern, RequestValidationError};
use crate::source::Statement;

/// Column every search statement returns its node under.
pub(crate) const NODE_COLUMN: &str = "n";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeIdSearch {
    pub node_id: i64,
    #[serde(default)]
    pub label: Option<NodeLabel>,
}

impl NodeIdSearch {
    pub fn new(node_id: i64) -> Self {
        Self {
            node_id,
            label: None,
        }
    }

    pub fn with_label(mut self, label: NodeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn statement(&self) -> Statement {
        Statement::new(format!(
            "MATCH (n{}) WHERE n.node_id = $node_id RETURN n",
            label_pattern(self.label)
        ))
        .param("node_id", self.node_id)
    }
}

/// Case-insensitive substring match on `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NameSearch {
    pub name: String,
    #[serde(default)]
    pub label: Option<NodeLabel>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl NameSearch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            limit: default_limit(),
        }
    }

    pub fn with_label(mut self, label: NodeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self, limits: &ApiConfig) -> Result<(), RequestValidationError> {
        if self.name.trim().is_empty() {
            return Err(RequestValidationError::EmptyName);
        }
        check_limit(self.limit, limits)
    }

    pub fn statement(&self) -> Statement {
        let text = match self.label {
            Some(label) => format!(
                "MATCH (n{}) WHERE toLower(n.name) CONTAINS toLower($name) RETURN n LIMIT $limit",
                label_pattern(Some(label))
            ),
            None => "MATCH (n) WHERE n.name IS NOT NULL AND toLower(n.name) CONTAINS toLower($name) \
                     RETURN n LIMIT $limit"
                .to_string(),
        };
        Statement::new(text)
            .param("name", self.name.clone())
            .param("limit", self.limit)
    }
}

/// Match on one allowlisted property, exact or by substring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PropertySearch {
    pub property_name: String,
    pub property_value: String,
    #[serde(default)]
    pub label: Option<NodeLabel>,
    #[serde(default)]
    pub exact_match: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl PropertySearch {
    pub fn new(property_name: impl Into<String>, property_value: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            property_value: property_value.into(),
            label: None,
            exact_match: false,
            limit: default_limit(),
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact_match = true;
        self
    }

    pub fn with_label(mut self, label: NodeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self, limits: &ApiConfig) -> Result<(), RequestValidationError> {
        if self.property_name.trim().is_empty() {
            return Err(RequestValidationError::EmptyPropertyName);
        }
        // The property name is interpolated, so it must come from the allowlist.
        if !is_searchable_property(&self.property_name) {
            return Err(RequestValidationError::UnknownProperty(
                self.property_name.clone(),
            ));
        }
        check_limit(self.limit, limits)
    }

    pub fn statement(&self) -> Statement {
        let condition = if self.exact_match {
            format!("n.`{}` = $value", self.property_name)
        } else {
            format!("toString(n.`{}`) CONTAINS $value", self.property_name)
        };
        Statement::new(format!(
            "MATCH (n{}) WHERE {} RETURN n LIMIT $limit",
            label_pattern(self.label),
            condition
        ))
        .param("value", self.property_value.clone())
        .param("limit", self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub nodes: Vec<GraphNode>,
    pub total: usize,
}

impl SearchResponse {
    /// Builds the response from rows carrying a node in the `n` column.
    /// Rows without one are skipped.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            match row.get(NODE_COLUMN) {
                Some(RawValue::Node(node)) => nodes.push(GraphNode::from_entity(node)),
                other => warn!(column = NODE_COLUMN, value = ?other, "search row without a node skipped"),
            }
        }
        let total = nodes.len();
        Self { nodes, total }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<LabelInfo>,
}

pub fn labels() -> LabelsResponse {
    LabelsResponse {
        labels: NodeLabel::ALL
            .iter()
            .map(|label| LabelInfo {
                name: label.as_str().to_string(),
                description: label.description().to_string(),
            })
            .collect(),
    }
}

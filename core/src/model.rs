use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Property that carries the store-level numeric id of a node.
pub const NODE_ID_PROPERTY: &str = "node_id";
/// Label reported for nodes that carry no labels at all.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Opaque token identifying one node or relationship within a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Scalar>),
}

impl Scalar {
    /// Integer view of the scalar. Integral floats qualify, everything else does not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(value) => Some(*value),
            Scalar::Float(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value < i64::MAX as f64 =>
            {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

pub type Properties = BTreeMap<String, Scalar>;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityNode {
    pub identity: Identity,
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl EntityNode {
    pub fn new<I, L>(identity: impl Into<Identity>, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            identity: identity.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A relationship as delivered by the driver.
///
/// `start_node`/`end_node` are populated when the driver materialized the
/// endpoints inline; the identities are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityEdge {
    pub identity: Identity,
    pub rel_type: String,
    pub start_identity: Identity,
    pub end_identity: Identity,
    pub properties: Properties,
    pub start_node: Option<Box<EntityNode>>,
    pub end_node: Option<Box<EntityNode>>,
}

impl EntityEdge {
    /// Edge that only references its endpoints by identity.
    pub fn new(
        identity: impl Into<Identity>,
        rel_type: impl Into<String>,
        start_identity: impl Into<Identity>,
        end_identity: impl Into<Identity>,
    ) -> Self {
        Self {
            identity: identity.into(),
            rel_type: rel_type.into(),
            start_identity: start_identity.into(),
            end_identity: end_identity.into(),
            properties: Properties::new(),
            start_node: None,
            end_node: None,
        }
    }

    /// Edge carrying both endpoints inline.
    pub fn between(
        identity: impl Into<Identity>,
        rel_type: impl Into<String>,
        start: &EntityNode,
        end: &EntityNode,
    ) -> Self {
        let mut edge = Self::new(
            identity,
            rel_type,
            start.identity.clone(),
            end.identity.clone(),
        );
        edge.start_node = Some(Box::new(start.clone()));
        edge.end_node = Some(Box::new(end.clone()));
        edge
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Nodes and edges of a traversal. Well-formed paths alternate node/edge,
/// but the two sequences are handled independently.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityPath {
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<EntityEdge>,
}

impl EntityPath {
    pub fn new(nodes: Vec<EntityNode>, edges: Vec<EntityEdge>) -> Self {
        Self { nodes, edges }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Scalar(Scalar),
    Sequence(Vec<RawValue>),
    Mapping(IndexMap<String, RawValue>),
    Node(EntityNode),
    Edge(EntityEdge),
    Path(EntityPath),
}

impl From<Scalar> for RawValue {
    fn from(value: Scalar) -> Self {
        RawValue::Scalar(value)
    }
}

impl From<EntityNode> for RawValue {
    fn from(value: EntityNode) -> Self {
        RawValue::Node(value)
    }
}

impl From<EntityEdge> for RawValue {
    fn from(value: EntityEdge) -> Self {
        RawValue::Edge(value)
    }
}

impl From<EntityPath> for RawValue {
    fn from(value: EntityPath) -> Self {
        RawValue::Path(value)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(value: Vec<RawValue>) -> Self {
        RawValue::Sequence(value)
    }
}

/// One result record: column name to value, in column order.
pub type Row = IndexMap<String, RawValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: Identity,
    #[serde(rename = "node_id")]
    pub numeric_id: i64,
    pub label: String,
    #[serde(default)]
    pub properties: Properties,
}

impl GraphNode {
    /// Client view of a node: `node_id` is lifted out of the properties and
    /// the first label becomes the display label.
    pub fn from_entity(node: &EntityNode) -> Self {
        let mut properties = node.properties.clone();
        let numeric_id = properties
            .remove(NODE_ID_PROPERTY)
            .and_then(|value| value.as_i64())
            .unwrap_or(0);
        let label = node
            .labels
            .first()
            .cloned()
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        Self {
            id: node.identity.clone(),
            numeric_id,
            label,
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub id: Identity,
    pub source: Identity,
    pub target: Identity,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Properties,
}

impl GraphLink {
    pub fn from_entity(edge: &EntityEdge) -> Self {
        Self {
            id: edge.identity.clone(),
            source: edge.start_identity.clone(),
            target: edge.end_identity.clone(),
            rel_type: edge.rel_type.clone(),
            properties: edge.properties.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subgraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_lifted_out_of_properties() {
        let node = EntityNode::new("4:x:1", Vec::<String>::new())
            .with_property("node_id", 42i64)
            .with_property("name", "X");

        let graph_node = GraphNode::from_entity(&node);
        assert_eq!(graph_node.numeric_id, 42);
        assert_eq!(graph_node.label, UNKNOWN_LABEL);
        assert_eq!(graph_node.properties.len(), 1);
        assert_eq!(graph_node.properties.get("name"), Some(&Scalar::from("X")));
    }

    #[test]
    fn test_non_integer_node_id_defaults_to_zero_and_is_removed() {
        let node = EntityNode::new("4:x:2", ["法人"]).with_property("node_id", "abc");
        let graph_node = GraphNode::from_entity(&node);
        assert_eq!(graph_node.numeric_id, 0);
        assert!(graph_node.properties.is_empty());
        assert_eq!(graph_node.label, "法人");
    }

    #[test]
    fn test_integral_float_node_id_is_accepted() {
        let node = EntityNode::new("4:x:3", ["a", "b"]).with_property("node_id", 7.0);
        let graph_node = GraphNode::from_entity(&node);
        assert_eq!(graph_node.numeric_id, 7);
        assert_eq!(graph_node.label, "a");

        let fractional = EntityNode::new("4:x:4", ["a"]).with_property("node_id", 7.5);
        assert_eq!(GraphNode::from_entity(&fractional).numeric_id, 0);
    }

    #[test]
    fn test_out_of_range_float_is_not_an_integer() {
        // 2^63 is exactly representable as f64 but not as i64.
        let too_large = 9_223_372_036_854_775_808.0_f64;
        assert_eq!(Scalar::Float(too_large).as_i64(), None);
        assert_eq!(Scalar::Float(-too_large).as_i64(), Some(i64::MIN));

        let node = EntityNode::new("4:x:5", ["a"]).with_property("node_id", too_large);
        assert_eq!(GraphNode::from_entity(&node).numeric_id, 0);
    }

    #[test]
    fn test_graph_node_serializes_with_wire_field_names() {
        let node = EntityNode::new("4:x:1", ["法人"]).with_property("node_id", 12345i64);
        let json = serde_json::to_value(GraphNode::from_entity(&node)).unwrap();
        assert_eq!(json["id"], "4:x:1");
        assert_eq!(json["node_id"], 12345);
        assert_eq!(json["label"], "法人");

        let edge = EntityEdge::new("5:x:1", "役員", "4:x:1", "4:x:2");
        let json = serde_json::to_value(GraphLink::from_entity(&edge)).unwrap();
        assert_eq!(json["type"], "役員");
        assert_eq!(json["source"], "4:x:1");
        assert_eq!(json["target"], "4:x:2");
    }
}

//! JSON wire representation of raw result values.
//!
//! Entities are tagged objects (`"_type": "node" | "relationship" | "path"`);
//! every other JSON shape maps onto the matching container or scalar.

use crate::model::{
    EntityEdge, EntityNode, EntityPath, Identity, Properties, RawValue, Row, Scalar,
};
use serde_json::{Map, Number, Value};
use thiserror::Error;

const TYPE_TAG: &str = "_type";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{entity} is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{entity} field `{field}` has an unexpected shape")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("property `{0}` is not a scalar value")]
    InvalidProperty(String),
    #[error("result row must be a JSON object")]
    NotARow,
}

pub fn decode_row(value: &Value) -> Result<Row, DecodeError> {
    let Value::Object(columns) = value else {
        return Err(DecodeError::NotARow);
    };
    columns
        .iter()
        .map(|(column, value)| decode_value(value).map(|value| (column.clone(), value)))
        .collect()
}

pub fn decode_value(value: &Value) -> Result<RawValue, DecodeError> {
    match value {
        Value::Null => Ok(RawValue::Null),
        Value::Array(items) => items
            .iter()
            .map(decode_value)
            .collect::<Result<Vec<_>, _>>()
            .map(RawValue::Sequence),
        Value::Object(object) => match object.get(TYPE_TAG).and_then(Value::as_str) {
            Some("node") => decode_node(object).map(RawValue::Node),
            Some("relationship") => decode_edge(object).map(RawValue::Edge),
            Some("path") => decode_path(object).map(RawValue::Path),
            _ => object
                .iter()
                .map(|(key, value)| decode_value(value).map(|value| (key.clone(), value)))
                .collect::<Result<_, _>>()
                .map(RawValue::Mapping),
        },
        scalar => decode_scalar(scalar)
            .map(RawValue::Scalar)
            .ok_or(DecodeError::InvalidField {
                entity: "value",
                field: "scalar",
            }),
    }
}

fn decode_node(object: &Map<String, Value>) -> Result<EntityNode, DecodeError> {
    const ENTITY: &str = "node";

    let identity = required_str(object, ENTITY, "element_id")?;
    let labels: Vec<String> = match object.get("labels") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(labels)) => labels
            .iter()
            .map(|label| {
                label
                    .as_str()
                    .map(str::to_string)
                    .ok_or(DecodeError::InvalidField {
                        entity: ENTITY,
                        field: "labels",
                    })
            })
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(DecodeError::InvalidField {
                entity: ENTITY,
                field: "labels",
            })
        }
    };

    Ok(EntityNode {
        identity: Identity::new(identity),
        labels,
        properties: decode_properties(object, ENTITY)?,
    })
}

fn decode_edge(object: &Map<String, Value>) -> Result<EntityEdge, DecodeError> {
    const ENTITY: &str = "relationship";

    let identity = required_str(object, ENTITY, "element_id")?;
    let rel_type = required_str(object, ENTITY, "type")?;

    Ok(EntityEdge {
        identity: Identity::new(identity),
        rel_type: rel_type.to_string(),
        start_identity: optional_identity(object, ENTITY, "start_node_element_id")?,
        end_identity: optional_identity(object, ENTITY, "end_node_element_id")?,
        properties: decode_properties(object, ENTITY)?,
        start_node: inline_node(object, ENTITY, "start_node")?,
        end_node: inline_node(object, ENTITY, "end_node")?,
    })
}

fn decode_path(object: &Map<String, Value>) -> Result<EntityPath, DecodeError> {
    const ENTITY: &str = "path";

    let nodes: Vec<EntityNode> = entity_array(object, ENTITY, "nodes")?
        .iter()
        .map(|value| match value {
            Value::Object(node) => decode_node(node),
            _ => Err(DecodeError::InvalidField {
                entity: ENTITY,
                field: "nodes",
            }),
        })
        .collect::<Result<_, _>>()?;
    let edges: Vec<EntityEdge> = entity_array(object, ENTITY, "relationships")?
        .iter()
        .map(|value| match value {
            Value::Object(edge) => decode_edge(edge),
            _ => Err(DecodeError::InvalidField {
                entity: ENTITY,
                field: "relationships",
            }),
        })
        .collect::<Result<_, _>>()?;

    Ok(EntityPath { nodes, edges })
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { entity, field }),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(DecodeError::InvalidField { entity, field }),
    }
}

// A null endpoint id decodes to the empty identity, which never matches a node.
fn optional_identity(
    object: &Map<String, Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<Identity, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(Identity::default()),
        Some(Value::String(value)) => Ok(Identity::new(value.as_str())),
        Some(_) => Err(DecodeError::InvalidField { entity, field }),
    }
}

fn inline_node(
    object: &Map<String, Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<Option<Box<EntityNode>>, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(node)) => decode_node(node).map(|node| Some(Box::new(node))),
        Some(_) => Err(DecodeError::InvalidField { entity, field }),
    }
}

fn entity_array<'a>(
    object: &'a Map<String, Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<&'a [Value], DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(DecodeError::InvalidField { entity, field }),
    }
}

fn decode_properties(
    object: &Map<String, Value>,
    entity: &'static str,
) -> Result<Properties, DecodeError> {
    match object.get("properties") {
        None | Some(Value::Null) => Ok(Properties::new()),
        Some(Value::Object(properties)) => properties
            .iter()
            .map(|(key, value)| {
                decode_scalar(value)
                    .map(|scalar| (key.clone(), scalar))
                    .ok_or_else(|| DecodeError::InvalidProperty(key.clone()))
            })
            .collect(),
        Some(_) => Err(DecodeError::InvalidField {
            entity,
            field: "properties",
        }),
    }
}

fn decode_scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::Bool(value) => Some(Scalar::Boolean(*value)),
        Value::Number(number) => number
            .as_i64()
            .map(Scalar::Integer)
            .or_else(|| number.as_f64().map(Scalar::Float)),
        Value::String(value) => Some(Scalar::String(value.clone())),
        Value::Array(items) => items
            .iter()
            .map(decode_scalar)
            .collect::<Option<Vec<_>>>()
            .map(Scalar::List),
        Value::Null | Value::Object(_) => None,
    }
}

pub fn encode_row(row: &Row) -> Value {
    Value::Object(
        row.iter()
            .map(|(column, value)| (column.clone(), encode_value(value)))
            .collect(),
    )
}

pub fn encode_value(value: &RawValue) -> Value {
    match value {
        RawValue::Null => Value::Null,
        RawValue::Scalar(scalar) => encode_scalar(scalar),
        RawValue::Sequence(items) => Value::Array(items.iter().map(encode_value).collect()),
        RawValue::Mapping(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect(),
        ),
        RawValue::Node(node) => encode_node(node),
        RawValue::Edge(edge) => encode_edge(edge),
        RawValue::Path(path) => serde_json::json!({
            "_type": "path",
            "nodes": path.nodes.iter().map(encode_node).collect::<Vec<_>>(),
            "relationships": path.edges.iter().map(encode_edge).collect::<Vec<_>>(),
        }),
    }
}

fn encode_node(node: &EntityNode) -> Value {
    serde_json::json!({
        "_type": "node",
        "element_id": node.identity.as_str(),
        "labels": node.labels,
        "properties": encode_properties(&node.properties),
    })
}

fn encode_edge(edge: &EntityEdge) -> Value {
    let endpoint = |identity: &Identity| {
        if identity.is_empty() {
            Value::Null
        } else {
            Value::String(identity.to_string())
        }
    };
    let mut encoded = serde_json::json!({
        "_type": "relationship",
        "element_id": edge.identity.as_str(),
        "type": edge.rel_type,
        "start_node_element_id": endpoint(&edge.start_identity),
        "end_node_element_id": endpoint(&edge.end_identity),
        "properties": encode_properties(&edge.properties),
    });
    if let Value::Object(object) = &mut encoded {
        if let Some(node) = &edge.start_node {
            object.insert("start_node".to_string(), encode_node(node));
        }
        if let Some(node) = &edge.end_node {
            object.insert("end_node".to_string(), encode_node(node));
        }
    }
    encoded
}

fn encode_properties(properties: &Properties) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(key, value)| (key.clone(), encode_scalar(value)))
            .collect(),
    )
}

fn encode_scalar(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Boolean(value) => Value::Bool(*value),
        Scalar::Integer(value) => Value::Number((*value).into()),
        Scalar::Float(value) => Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Scalar::String(value) => Value::String(value.clone()),
        Scalar::List(items) => Value::Array(items.iter().map(encode_scalar).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_tagged_entities_inside_containers() {
        let raw = json!({
            "rows": [
                {"_type": "node", "element_id": "4:a:1", "labels": ["法人"], "properties": {"node_id": 1}},
                {"_type": "relationship", "element_id": "5:a:1", "type": "役員",
                 "start_node_element_id": "4:a:1", "end_node_element_id": "4:a:2", "properties": {}},
                42,
                null
            ]
        });

        let RawValue::Mapping(mapping) = decode_value(&raw).unwrap() else {
            panic!("expected mapping");
        };
        let RawValue::Sequence(items) = &mapping["rows"] else {
            panic!("expected sequence");
        };
        assert!(matches!(&items[0], RawValue::Node(node) if node.identity.as_str() == "4:a:1"));
        assert!(matches!(&items[1], RawValue::Edge(edge) if edge.rel_type == "役員"));
        assert_eq!(items[2], RawValue::Scalar(Scalar::Integer(42)));
        assert_eq!(items[3], RawValue::Null);
    }

    #[test]
    fn test_relationship_without_type_is_rejected() {
        let raw = json!({"_type": "relationship", "element_id": "5:a:1"});
        assert_eq!(
            decode_value(&raw),
            Err(DecodeError::MissingField {
                entity: "relationship",
                field: "type"
            })
        );
    }

    #[test]
    fn test_null_endpoint_decodes_to_empty_identity() {
        let raw = json!({
            "_type": "relationship", "element_id": "5:a:1", "type": "仲介",
            "start_node_element_id": null, "end_node_element_id": "4:a:2"
        });
        let RawValue::Edge(edge) = decode_value(&raw).unwrap() else {
            panic!("expected edge");
        };
        assert!(edge.start_identity.is_empty());
        assert_eq!(edge.end_identity.as_str(), "4:a:2");
        assert!(edge.start_node.is_none());
    }

    #[test]
    fn test_nested_property_object_is_rejected() {
        let raw = json!({
            "_type": "node", "element_id": "4:a:1", "labels": [],
            "properties": {"address": {"street": "x"}}
        });
        assert_eq!(
            decode_value(&raw),
            Err(DecodeError::InvalidProperty("address".to_string()))
        );
    }

    #[test]
    fn test_unknown_type_tag_is_plain_mapping() {
        let raw = json!({"_type": "vertex", "id": 1});
        assert!(matches!(decode_value(&raw).unwrap(), RawValue::Mapping(_)));
    }

    #[test]
    fn test_path_encoding_matches_decoding() {
        let a = EntityNode::new("4:a:1", ["法人"]).with_property("node_id", 1i64);
        let b = EntityNode::new("4:a:2", ["住所"]).with_property("countries", "Japan");
        let edge = EntityEdge::new("5:a:1", "所在地", "4:a:1", "4:a:2").with_property("weight", 0.5);
        let path = RawValue::Path(EntityPath::new(vec![a, b], vec![edge]));

        let encoded = encode_value(&path);
        assert_eq!(encoded["_type"], "path");
        assert_eq!(encoded["relationships"][0]["start_node_element_id"], "4:a:1");
        assert_eq!(decode_value(&encoded).unwrap(), path);
    }

    #[test]
    fn test_inline_endpoints_survive_encoding() {
        let a = EntityNode::new("4:b:1", ["役員/株主"]).with_property("name", "Person B");
        let b = EntityNode::new("4:b:2", ["法人"]).with_property("node_id", 12345i64);
        let edge = RawValue::Edge(EntityEdge::between("5:b:1", "役員", &a, &b));

        let encoded = encode_value(&edge);
        assert_eq!(encoded["start_node"]["element_id"], "4:b:1");
        assert_eq!(encoded["end_node"]["labels"][0], "法人");
        assert_eq!(decode_value(&encoded).unwrap(), edge);

        let bare = EntityEdge::new("5:b:2", "仲介", "4:b:1", "4:b:2");
        let encoded = encode_value(&RawValue::Edge(bare));
        assert!(encoded.get("start_node").is_none());
        assert!(encoded.get("end_node").is_none());
    }

    #[test]
    fn test_decode_row_requires_object() {
        assert_eq!(decode_row(&json!([1, 2])), Err(DecodeError::NotARow));
        let row = decode_row(&json!({"n": null, "count": 3})).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row["count"], RawValue::Scalar(Scalar::Integer(3)));
    }
}

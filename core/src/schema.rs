//! Closed vocabulary of the investigation graph.
//!
//! Labels and relationship types are Japanese identifiers in the store; the
//! enum variants give them stable Rust names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    #[serde(rename = "役員/株主")]
    Officer,
    #[serde(rename = "法人")]
    Entity,
    #[serde(rename = "仲介者")]
    Intermediary,
    #[serde(rename = "住所")]
    Address,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 4] = [
        NodeLabel::Officer,
        NodeLabel::Entity,
        NodeLabel::Intermediary,
        NodeLabel::Address,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Officer => "役員/株主",
            NodeLabel::Entity => "法人",
            NodeLabel::Intermediary => "仲介者",
            NodeLabel::Address => "住所",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NodeLabel::Officer => "Officers and shareholders (役員/株主)",
            NodeLabel::Entity => "Corporate entities (法人)",
            NodeLabel::Intermediary => "Intermediaries (仲介者)",
            NodeLabel::Address => "Addresses (住所)",
        }
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "役員")]
    Officer,
    #[serde(rename = "仲介")]
    Intermediary,
    #[serde(rename = "所在地")]
    Location,
    #[serde(rename = "登録住所")]
    RegisteredAddress,
    #[serde(rename = "同名人物")]
    SameName,
    #[serde(rename = "同一人物?")]
    PossiblySame,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 6] = [
        RelationshipType::Officer,
        RelationshipType::Intermediary,
        RelationshipType::Location,
        RelationshipType::RegisteredAddress,
        RelationshipType::SameName,
        RelationshipType::PossiblySame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Officer => "役員",
            RelationshipType::Intermediary => "仲介",
            RelationshipType::Location => "所在地",
            RelationshipType::RegisteredAddress => "登録住所",
            RelationshipType::SameName => "同名人物",
            RelationshipType::PossiblySame => "同一人物?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RelationshipType::Officer => "Officer relationship",
            RelationshipType::Intermediary => "Intermediary relationship",
            RelationshipType::Location => "Location relationship",
            RelationshipType::RegisteredAddress => "Registered address relationship",
            RelationshipType::SameName => "Same name person",
            RelationshipType::PossiblySame => "Possibly same person",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node properties that may be used as a search key.
pub const SEARCHABLE_PROPERTIES: [&str; 21] = [
    "address",
    "company_type",
    "countries",
    "country_codes",
    "dorm_date",
    "former_name",
    "ibcRUC",
    "inactivation_date",
    "incorporation_date",
    "internal_id",
    "jurisdiction",
    "jurisdiction_description",
    "name",
    "node_id",
    "note",
    "original_name",
    "service_provider",
    "sourceID",
    "status",
    "struck_off_date",
    "valid_until",
];

pub fn is_searchable_property(name: &str) -> bool {
    SEARCHABLE_PROPERTIES.contains(&name)
}

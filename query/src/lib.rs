//! Read-only graph service over an abstract Cypher source.
//!
//! Requests are validated, planned into parameterized [`source::Statement`]s,
//! run against a [`source::GraphSource`], and the resulting row streams are
//! assembled into subgraphs by the `assembly` crate.

pub mod cypher;
pub mod dsl;
pub mod engine;
pub mod network;
pub mod search;
pub mod source;

pub use cypher::{
    ConnectedComponentsResponse, CypherRequest, CypherResponse, SchemaResponse, StatsResponse,
};
pub use dsl::RequestValidationError;
pub use engine::{GraphService, QueryError};
pub use network::{NetworkRequest, RelationshipTypesResponse, ShortestPathRequest};
pub use search::{LabelsResponse, NameSearch, NodeIdSearch, PropertySearch, SearchResponse};
pub use source::{GraphSource, StaticSource, Statement};

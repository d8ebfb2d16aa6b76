//! Graph assembly over raw query results.
//!
//! Result rows are walked into identity-keyed registries
//! ([`GraphCollector`]); the registries are then either partitioned into
//! connected components or merged into a single subgraph.

pub mod collector;
pub mod merge;
pub mod partition;
pub mod registry;
pub mod stream;
pub mod subgraph;
pub mod walker;

pub use collector::{assemble_merged, assemble_partitioned, GraphCollector};
pub use registry::{LinkRegistry, NodeRegistry, Registry};
pub use stream::{BufferedRows, ChannelRows, ResultStream, RowSender, StreamError};

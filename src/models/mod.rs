//! Data models.
//!
//! Typed views over input rows and the graph they build.

pub mod graph;
pub mod records;

pub use graph::{Edge, KnowledgeGraph, Node, NodeOrigin};
pub use records::{DEFAULT_CATEGORY, DEFAULT_RELATION, EntityRecord, RelationshipRecord};

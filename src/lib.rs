//! # graphrag-viz
//!
//! Renders GraphRAG entity and relationship tables as an interactive HTML graph.
//!
//! The crate is a three-stage pipeline:
//!
//! 1. **Load**: read the entity and relationship tables ([`io`])
//! 2. **Build**: map rows to an undirected graph ([`services::GraphBuilder`])
//! 3. **Render**: write a vis-network HTML document ([`rendering::HtmlRenderer`])
//!
//! ## Example
//!
//! ```rust
//! use graphrag_viz::io::Record;
//! use graphrag_viz::services::GraphBuilder;
//!
//! let entities = vec![
//!     Record::from_pairs([("id", "A"), ("name", "Alice")]),
//!     Record::from_pairs([("id", "B")]),
//! ];
//! let relationships = vec![Record::from_pairs([
//!     ("source", "A"),
//!     ("target", "B"),
//!     ("predicate", "knows"),
//! ])];
//!
//! let (graph, _stats) = GraphBuilder::default().build(&entities, &relationships)?;
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.node("A").map(|n| n.label.as_str()), Some("Alice"));
//! assert_eq!(graph.edge("B", "A").map(|e| e.relation_label.as_str()), Some("knows"));
//! # Ok::<(), graphrag_viz::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod rendering;
pub mod services;

pub use config::VisualizerConfig;
pub use models::{Edge, KnowledgeGraph, Node, NodeOrigin};
pub use services::{BuildOptions, BuildStats, GraphBuilder, Pipeline, PipelineReport};

/// Error type for graphrag-viz operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown file extension, malformed CSV/JSON/YAML/Parquet content |
/// | `OperationFailed` | File I/O errors, config parse errors, logging init failures |
/// | `MissingField` | An entity row lacks `id`, a relationship row lacks `source`/`target` |
/// | `DanglingEndpoint` | A relationship names an undeclared node under the reject policy |
/// | `DuplicateEntity` | Two entity rows share an id under the reject policy |
/// | `FeatureNotEnabled` | A Parquet input is given to a build without the `parquet` feature |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - An input file cannot be opened or read
    /// - The output document cannot be written or renamed into place
    /// - The configuration file cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A required field is absent or null.
    #[error("{set} row {row}: missing required field '{field}'")]
    MissingField {
        /// Record set the row belongs to (`entities` or `relationships`).
        set: &'static str,
        /// Zero-based row index within the record set.
        row: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A relationship endpoint does not name any entity.
    #[error("relationships row {row}: endpoint '{id}' is not a declared entity")]
    DanglingEndpoint {
        /// The unknown endpoint id.
        id: String,
        /// Zero-based row index within the relationship set.
        row: usize,
    },

    /// An entity id appears more than once.
    #[error("entities row {row}: duplicate entity id '{id}'")]
    DuplicateEntity {
        /// The repeated entity id.
        id: String,
        /// Zero-based row index of the repeated occurrence.
        row: usize,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for graphrag-viz operations.
pub type Result<T> = std::result::Result<T, Error>;

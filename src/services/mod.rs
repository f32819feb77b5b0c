//! Business logic services.
//!
//! The graph builder turns loaded rows into a graph; the pipeline chains
//! loading, building and rendering.

mod graph_builder;
mod pipeline;

pub use graph_builder::{BuildOptions, BuildStats, DuplicatePolicy, EndpointPolicy, GraphBuilder};
pub use pipeline::{Pipeline, PipelineReport};

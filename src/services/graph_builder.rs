//! Graph construction from entity and relationship rows.
//!
//! Each entity row becomes one node keyed by its `id`; each relationship row
//! becomes one undirected edge between the nodes keyed by `source` and
//! `target`. Rows are applied in order and later rows overwrite earlier ones
//! that share a node id or an endpoint pair.

use crate::io::Record;
use crate::models::{Edge, EntityRecord, KnowledgeGraph, Node, RelationshipRecord};
use crate::{Error, Result};
use serde::Deserialize;
use std::time::Instant;
use tracing::instrument;

/// What to do with a relationship endpoint that no entity row declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointPolicy {
    /// Create the node with the entity defaults (label = id, category = `Entity`).
    #[default]
    Synthesize,
    /// Fail the build with [`Error::DanglingEndpoint`].
    Reject,
}

/// What to do when two entity rows share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The later row overwrites the node attributes.
    #[default]
    LastWriteWins,
    /// Fail the build with [`Error::DuplicateEntity`].
    Reject,
}

/// Options for [`GraphBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Dangling endpoint handling.
    pub endpoints: EndpointPolicy,
    /// Duplicate entity id handling.
    pub duplicates: DuplicatePolicy,
}

impl BuildOptions {
    /// Sets the endpoint policy.
    #[must_use]
    pub const fn with_endpoints(mut self, endpoints: EndpointPolicy) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the duplicate policy.
    #[must_use]
    pub const fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Rejects both dangling endpoints and duplicate entity ids.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            endpoints: EndpointPolicy::Reject,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

/// Counters collected while building a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Entity rows read.
    pub entity_rows: usize,
    /// Relationship rows read.
    pub relationship_rows: usize,
    /// Nodes in the finished graph.
    pub nodes: usize,
    /// Edges in the finished graph.
    pub edges: usize,
    /// Entity rows that overwrote an earlier row with the same id.
    pub duplicate_entities: usize,
    /// Relationship rows that overwrote an existing edge.
    pub overwritten_edges: usize,
    /// Nodes created for undeclared relationship endpoints.
    pub endpoint_nodes: usize,
}

/// Builds a [`KnowledgeGraph`] from row sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    /// Creates a builder with the given options.
    #[must_use]
    pub const fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Returns the builder options.
    #[must_use]
    pub const fn options(&self) -> BuildOptions {
        self.options
    }

    /// Builds the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for a row without a required field,
    /// and [`Error::DuplicateEntity`] / [`Error::DanglingEndpoint`] when the
    /// corresponding policy is `Reject`. No partial graph is returned.
    #[instrument(
        name = "graphrag_viz.graph.build",
        skip_all,
        fields(entities = entities.len(), relationships = relationships.len())
    )]
    pub fn build(
        &self,
        entities: &[Record],
        relationships: &[Record],
    ) -> Result<(KnowledgeGraph, BuildStats)> {
        let start = Instant::now();
        let mut graph = KnowledgeGraph::new();
        let mut stats = BuildStats {
            entity_rows: entities.len(),
            relationship_rows: relationships.len(),
            ..BuildStats::default()
        };

        for (row, record) in entities.iter().enumerate() {
            let entity = EntityRecord::from_record(record, row)?;
            if graph.contains_node(&entity.id) {
                if self.options.duplicates == DuplicatePolicy::Reject {
                    return Err(Error::DuplicateEntity { id: entity.id, row });
                }
                tracing::debug!(id = %entity.id, row, "entity row overwrites earlier row");
                stats.duplicate_entities += 1;
            }
            graph.upsert_node(Node::from(&entity));
        }

        for (row, record) in relationships.iter().enumerate() {
            let rel = RelationshipRecord::from_record(record, row)?;
            if self.options.endpoints == EndpointPolicy::Reject {
                for id in [&rel.source, &rel.target] {
                    if !graph.contains_node(id) {
                        return Err(Error::DanglingEndpoint {
                            id: id.clone(),
                            row,
                        });
                    }
                }
            }

            let nodes_before = graph.node_count();
            if graph.upsert_edge(Edge::from(&rel)).is_some() {
                stats.overwritten_edges += 1;
            }
            stats.endpoint_nodes += graph.node_count() - nodes_before;
        }

        stats.nodes = graph.node_count();
        stats.edges = graph.edge_count();

        if stats.duplicate_entities > 0 {
            tracing::warn!(
                count = stats.duplicate_entities,
                "duplicate entity ids; later rows overwrote earlier ones"
            );
        }
        if stats.endpoint_nodes > 0 {
            tracing::info!(
                count = stats.endpoint_nodes,
                "created nodes for relationship endpoints without entity rows"
            );
        }

        metrics::counter!("graph_nodes_built_total").increment(stats.nodes as u64);
        metrics::counter!("graph_edges_built_total").increment(stats.edges as u64);
        metrics::histogram!("graph_build_duration_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);

        tracing::debug!(
            nodes = stats.nodes,
            edges = stats.edges,
            duration_ms = start.elapsed().as_millis(),
            "graph built"
        );

        Ok((graph, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeOrigin;

    fn entity(id: &str) -> Record {
        Record::from_pairs([("id", id)])
    }

    fn rel(source: &str, target: &str) -> Record {
        Record::from_pairs([("source", source), ("target", target)])
    }

    #[test]
    fn test_reference_example() {
        let entities = vec![
            Record::from_pairs([("id", "A"), ("name", "Alice")]),
            entity("B"),
        ];
        let relationships = vec![Record::from_pairs([
            ("source", "A"),
            ("target", "B"),
            ("predicate", "knows"),
        ])];

        let (graph, stats) = GraphBuilder::default()
            .build(&entities, &relationships)
            .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node("A").unwrap().label, "Alice");
        assert_eq!(graph.node("B").unwrap().label, "B");
        assert_eq!(graph.edge("A", "B").unwrap().relation_label, "knows");
        assert_eq!(stats.endpoint_nodes, 0);
        assert_eq!(stats.duplicate_entities, 0);
    }

    #[test]
    fn test_defaults_applied_per_row() {
        let entities = vec![
            Record::from_pairs([("id", "A"), ("type", "PERSON")]),
            entity("B"),
        ];
        let relationships = vec![rel("A", "B")];

        let (graph, _) = GraphBuilder::default()
            .build(&entities, &relationships)
            .unwrap();

        assert_eq!(graph.node("A").unwrap().category, "PERSON");
        assert_eq!(graph.node("B").unwrap().category, "Entity");
        assert_eq!(graph.edge("A", "B").unwrap().relation_label, "related to");
    }

    #[test]
    fn test_duplicate_entities_last_write_wins() {
        let entities = vec![
            Record::from_pairs([("id", "A"), ("name", "First")]),
            Record::from_pairs([("id", "A"), ("name", "Second"), ("type", "ORG")]),
        ];

        let (graph, stats) = GraphBuilder::default().build(&entities, &[]).unwrap();

        assert_eq!(graph.node_count(), 1);
        let node = graph.node("A").unwrap();
        assert_eq!(node.label, "Second");
        assert_eq!(node.category, "ORG");
        assert_eq!(stats.duplicate_entities, 1);
    }

    #[test]
    fn test_duplicate_entities_rejected() {
        let entities = vec![entity("A"), entity("B"), entity("A")];
        let builder = GraphBuilder::new(
            BuildOptions::default().with_duplicates(DuplicatePolicy::Reject),
        );

        let err = builder.build(&entities, &[]).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntity { ref id, row: 2 } if id == "A"));
    }

    #[test]
    fn test_dangling_endpoint_synthesized() {
        let entities = vec![entity("A")];
        let relationships = vec![rel("A", "Z"), rel("Z", "Y")];

        let (graph, stats) = GraphBuilder::default()
            .build(&entities, &relationships)
            .unwrap();

        let z = graph.node("Z").unwrap();
        assert_eq!(z.label, "Z");
        assert_eq!(z.category, "Entity");
        assert_eq!(z.origin, NodeOrigin::Endpoint);
        assert_eq!(graph.node("A").unwrap().origin, NodeOrigin::Entity);
        assert_eq!(stats.endpoint_nodes, 2);
        assert_eq!(stats.nodes, 3);
    }

    #[test]
    fn test_dangling_endpoint_rejected() {
        let entities = vec![entity("A"), entity("B")];
        let relationships = vec![rel("A", "B"), rel("B", "Q")];
        let builder =
            GraphBuilder::new(BuildOptions::default().with_endpoints(EndpointPolicy::Reject));

        let err = builder.build(&entities, &relationships).unwrap_err();
        assert!(matches!(err, Error::DanglingEndpoint { ref id, row: 1 } if id == "Q"));
    }

    #[test]
    fn test_reverse_relationship_overwrites_edge() {
        let entities = vec![entity("A"), entity("B")];
        let relationships = vec![
            Record::from_pairs([("source", "A"), ("target", "B"), ("predicate", "knows")]),
            Record::from_pairs([("source", "B"), ("target", "A"), ("predicate", "trusts")]),
        ];

        let (graph, stats) = GraphBuilder::default()
            .build(&entities, &relationships)
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge("A", "B").unwrap().relation_label, "trusts");
        assert_eq!(stats.overwritten_edges, 1);
    }

    #[test]
    fn test_missing_required_fields() {
        let err = GraphBuilder::default()
            .build(&[Record::from_pairs([("name", "x")])], &[])
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "id", .. }));

        let err = GraphBuilder::default()
            .build(&[entity("A")], &[Record::from_pairs([("target", "A")])])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                set: "relationships",
                row: 0,
                field: "source"
            }
        ));
    }

    #[test]
    fn test_empty_inputs() {
        let (graph, stats) = GraphBuilder::default().build(&[], &[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(stats, BuildStats::default());
    }

    #[test]
    fn test_strict_options() {
        let options = BuildOptions::strict();
        assert_eq!(options.endpoints, EndpointPolicy::Reject);
        assert_eq!(options.duplicates, DuplicatePolicy::Reject);
        assert_eq!(GraphBuilder::new(options).options(), options);
    }
}

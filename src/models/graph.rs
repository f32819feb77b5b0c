//! In-memory knowledge graph.
//!
//! An undirected simple graph keyed by node id. Nodes carry a display label
//! and a category; edges carry a relation label. Inserting an existing node
//! id or an existing unordered endpoint pair overwrites the attributes
//! instead of adding a duplicate.
//!
//! # Example
//!
//! ```rust
//! use graphrag_viz::models::{Edge, KnowledgeGraph, Node};
//!
//! let mut graph = KnowledgeGraph::new();
//! graph.upsert_node(Node::new("A", "Alice", "PERSON"));
//! graph.upsert_edge(Edge::new("A", "B", "knows"));
//!
//! // `B` was created implicitly as an endpoint node
//! assert_eq!(graph.node_count(), 2);
//! assert!(graph.edge("B", "A").is_some());
//! ```

use crate::models::records::{DEFAULT_CATEGORY, EntityRecord, RelationshipRecord};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How a node came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeOrigin {
    /// Declared by an entity row.
    Entity,
    /// Created for a relationship endpoint no entity row declared.
    Endpoint,
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node identity.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Category annotation.
    pub category: String,
    /// Where the node came from.
    pub origin: NodeOrigin,
}

impl Node {
    /// Creates an entity node.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: category.into(),
            origin: NodeOrigin::Entity,
        }
    }

    /// Creates an endpoint node carrying the entity defaults.
    #[must_use]
    pub fn endpoint(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            category: DEFAULT_CATEGORY.to_string(),
            origin: NodeOrigin::Endpoint,
        }
    }
}

impl From<&EntityRecord> for Node {
    fn from(entity: &EntityRecord) -> Self {
        Self::new(entity.id.clone(), entity.label(), entity.category())
    }
}

/// An undirected graph connection.
///
/// `source` and `target` keep the orientation of the row that last wrote the
/// edge; lookups ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Id of one endpoint.
    pub source: String,
    /// Id of the other endpoint.
    pub target: String,
    /// Relation label.
    pub relation_label: String,
}

impl Edge {
    /// Creates an edge.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation_label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation_label: relation_label.into(),
        }
    }

    /// Returns the endpoints as an ordered pair (smaller id first).
    #[must_use]
    pub fn endpoints(&self) -> (&str, &str) {
        if self.source <= self.target {
            (&self.source, &self.target)
        } else {
            (&self.target, &self.source)
        }
    }
}

impl From<&RelationshipRecord> for Edge {
    fn from(rel: &RelationshipRecord) -> Self {
        Self::new(rel.source.clone(), rel.target.clone(), rel.relation_label())
    }
}

/// Undirected simple graph keyed by node id.
///
/// Iteration order of [`nodes`](Self::nodes) and [`edges`](Self::edges) is
/// first-insertion order; overwriting keeps an element's position.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: UnGraph<Node, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, or overwrites the attributes of the node with the same id.
    ///
    /// Returns the previous node when one was replaced.
    pub fn upsert_node(&mut self, node: Node) -> Option<Node> {
        if let Some(&idx) = self.index.get(&node.id) {
            return Some(std::mem::replace(&mut self.graph[idx], node));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        None
    }

    /// Inserts an edge, or overwrites the edge between the same two nodes.
    ///
    /// Endpoints that are not in the graph are created with
    /// [`Node::endpoint`]. Returns the previous edge when one was replaced.
    pub fn upsert_edge(&mut self, edge: Edge) -> Option<Edge> {
        let a = self.ensure_endpoint(&edge.source);
        let b = self.ensure_endpoint(&edge.target);

        match self.graph.find_edge(a, b) {
            Some(existing) => Some(std::mem::replace(&mut self.graph[existing], edge)),
            None => {
                self.graph.add_edge(a, b, edge);
                None
            },
        }
    }

    fn ensure_endpoint(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(Node::endpoint(id));
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Returns true if a node with this id exists.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Looks up the edge between two nodes, in either orientation.
    #[must_use]
    pub fn edge(&self, a: &str, b: &str) -> Option<&Edge> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        self.graph.find_edge(a, b).map(|idx| &self.graph[idx])
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the set of node ids.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes().map(|n| n.id.as_str()).collect()
    }

    /// Returns the set of edges as ordered endpoint pairs.
    #[must_use]
    pub fn edge_pairs(&self) -> BTreeSet<(&str, &str)> {
        self.edges().map(Edge::endpoints).collect()
    }

    /// Counts nodes per category.
    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes() {
            *counts.entry(node.category.as_str()).or_default() += 1;
        }
        counts
    }

    /// Returns the number of edge ends touching a node (a self-loop counts twice).
    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.edges()
            .map(|e| usize::from(e.source == id) + usize::from(e.target == id))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_node_overwrites() {
        let mut graph = KnowledgeGraph::new();
        assert!(graph.upsert_node(Node::new("A", "Alice", "PERSON")).is_none());

        let previous = graph.upsert_node(Node::new("A", "Alicia", "EMPLOYEE"));
        assert_eq!(previous.map(|n| n.label), Some("Alice".to_string()));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("A").unwrap().label, "Alicia");
        assert_eq!(graph.node("A").unwrap().category, "EMPLOYEE");
    }

    #[test]
    fn test_upsert_edge_is_undirected() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_node(Node::new("A", "Alice", "PERSON"));
        graph.upsert_node(Node::new("B", "Bob", "PERSON"));

        assert!(graph.upsert_edge(Edge::new("A", "B", "knows")).is_none());
        let previous = graph.upsert_edge(Edge::new("B", "A", "married to"));

        assert_eq!(previous.map(|e| e.relation_label), Some("knows".to_string()));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge("A", "B").unwrap().relation_label, "married to");
    }

    #[test]
    fn test_upsert_edge_creates_endpoint_nodes() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_edge(Edge::new("X", "Y", "related to"));

        let x = graph.node("X").unwrap();
        assert_eq!(x.label, "X");
        assert_eq!(x.category, DEFAULT_CATEGORY);
        assert_eq!(x.origin, NodeOrigin::Endpoint);
        assert!(graph.contains_node("Y"));
    }

    #[test]
    fn test_self_loop() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_edge(Edge::new("A", "A", "self"));
        graph.upsert_edge(Edge::new("A", "A", "again"));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree("A"), 2);
    }

    #[test]
    fn test_edge_pairs_are_normalized() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_edge(Edge::new("B", "A", "r"));
        graph.upsert_edge(Edge::new("B", "C", "r"));

        let pairs = graph.edge_pairs();
        assert!(pairs.contains(&("A", "B")));
        assert!(pairs.contains(&("B", "C")));
        assert_eq!(graph.degree("B"), 2);
        assert_eq!(graph.degree("missing"), 0);
    }

    #[test]
    fn test_insertion_order_survives_overwrite() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_node(Node::new("A", "A", "T"));
        graph.upsert_node(Node::new("B", "B", "T"));
        graph.upsert_node(Node::new("A", "A2", "T"));

        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_category_counts() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_node(Node::new("A", "A", "PERSON"));
        graph.upsert_node(Node::new("B", "B", "PERSON"));
        graph.upsert_edge(Edge::new("A", "Z", "r"));

        let counts = graph.category_counts();
        assert_eq!(counts.get("PERSON"), Some(&2));
        assert_eq!(counts.get("Entity"), Some(&1));
    }
}

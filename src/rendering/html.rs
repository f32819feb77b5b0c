//! Interactive HTML output.
//!
//! Produces a single document that embeds the graph as vis-network
//! `DataSet`s. Node hover text is the category and edge hover text is the
//! relation label. Layout and physics run in the browser.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

use super::template::{RenderContext, render_template};
use crate::models::KnowledgeGraph;
use crate::{Error, Result};

/// Default vis-network build referenced by the document.
pub const DEFAULT_ENGINE_URL: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{{title}}</title>
<script src="{{engine_url}}"></script>
<style>
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif}
#summary{padding:6px 10px;font-size:12px;color:#57606a}
#graph{width:{{width}};height:{{height}};border:1px solid #d0d7de;background:#ffffff}
</style>
</head>
<body>
<div id="summary">{{summary}}</div>
<div id="graph"></div>
<script>
const nodes = new vis.DataSet({{nodes}});
const edges = new vis.DataSet({{edges}});
const options = {{options}};
const network = new vis.Network(document.getElementById("graph"), { nodes, edges }, options);
</script>
</body>
</html>
"#;

/// Page and engine settings for the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// CSS height of the graph canvas.
    pub height: String,
    /// CSS width of the graph canvas.
    pub width: String,
    /// Page title.
    pub title: String,
    /// Whether the physics simulation runs.
    pub physics: bool,
    /// Whether nodes are coloured by category.
    pub color_by_category: bool,
    /// Location of the vis-network script.
    pub engine_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            height: "800px".to_string(),
            width: "100%".to_string(),
            title: "GraphRAG Visualization".to_string(),
            physics: true,
            color_by_category: true,
            engine_url: DEFAULT_ENGINE_URL.to_string(),
        }
    }
}

/// Result of writing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    /// Where the document was written.
    pub path: PathBuf,
    /// Document size in bytes.
    pub bytes: usize,
}

#[derive(Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    shape: &'static str,
}

#[derive(Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
    title: &'a str,
}

/// Renders a [`KnowledgeGraph`] as a vis-network HTML document.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Creates a renderer with the given options.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Renders the document in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph data cannot be serialized.
    pub fn render(&self, graph: &KnowledgeGraph) -> Result<String> {
        let nodes: Vec<VisNode<'_>> = graph
            .nodes()
            .map(|node| VisNode {
                id: &node.id,
                label: &node.label,
                title: &node.category,
                group: self
                    .options
                    .color_by_category
                    .then_some(node.category.as_str()),
                shape: "dot",
            })
            .collect();
        let edges: Vec<VisEdge<'_>> = graph
            .edges()
            .map(|edge| VisEdge {
                from: &edge.source,
                to: &edge.target,
                title: &edge.relation_label,
            })
            .collect();
        let options = json!({
            "physics": {
                "enabled": self.options.physics,
                "stabilization": { "iterations": 200 }
            },
            "interaction": { "hover": true, "tooltipDelay": 200 },
            "nodes": { "size": 10 }
        });

        let mut summary = format!("{} nodes, {} edges", graph.node_count(), graph.edge_count());
        let categories = graph.category_counts();
        if !categories.is_empty() {
            summary.push_str(" | ");
            for (i, (category, count)) in categories.iter().enumerate() {
                if i > 0 {
                    summary.push_str(", ");
                }
                let _ = write!(summary, "{category}: {count}");
            }
        }

        let mut ctx = RenderContext::new();
        ctx.add_string("title", html_escape(&self.options.title));
        ctx.add_string("engine_url", html_escape(&self.options.engine_url));
        ctx.add_string("width", html_escape(&self.options.width));
        ctx.add_string("height", html_escape(&self.options.height));
        ctx.add_string("summary", html_escape(&summary));
        ctx.add_string("nodes", script_json(&nodes)?);
        ctx.add_string("edges", script_json(&edges)?);
        ctx.add_string("options", script_json(&options)?);

        render_template(DOCUMENT_TEMPLATE, &ctx)
    }

    /// Renders the document and writes it to `path`.
    ///
    /// The document goes to a sibling temporary file first and is renamed
    /// into place, so `path` never holds a partial document.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    #[instrument(
        name = "graphrag_viz.render.write",
        skip(self, graph),
        fields(path = %path.display())
    )]
    pub fn write(&self, graph: &KnowledgeGraph, path: &Path) -> Result<RenderSummary> {
        let document = self.render(graph)?;
        write_atomic(path, document.as_bytes())?;

        metrics::counter!("graph_render_bytes_total").increment(document.len() as u64);
        tracing::debug!(bytes = document.len(), "document written");

        Ok(RenderSummary {
            path: path.to_path_buf(),
            bytes: document.len(),
        })
    }
}

/// Serializes a value as JSON that is safe inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where their `\u` escapes
/// are equivalent.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_graph".to_string(),
        cause: e.to_string(),
    })?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Escapes text for HTML element content and attribute values.
fn html_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_error = |operation: &str, e: std::io::Error| Error::OperationFailed {
        operation: operation.to_string(),
        cause: format!("{}: {e}", path.display()),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error("create_output_dir", e))?;
    }

    let mut tmp_name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .ok_or_else(|| {
            Error::InvalidInput(format!("Output path has no file name: {}", path.display()))
        })?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents).map_err(|e| write_error("write_output", e))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_error("rename_output", e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};

    fn sample_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_node(Node::new("A", "Alice", "PERSON"));
        graph.upsert_node(Node::new("B", "B", "Entity"));
        graph.upsert_edge(Edge::new("A", "B", "knows"));
        graph
    }

    #[test]
    fn test_render_embeds_graph_data() {
        let html = HtmlRenderer::default().render(&sample_graph()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#""id":"A","label":"Alice","title":"PERSON","group":"PERSON""#));
        assert!(html.contains(r#"{"from":"A","to":"B","title":"knows"}"#));
        assert!(html.contains(DEFAULT_ENGINE_URL));
        assert!(html.contains("height:800px"));
        assert!(html.contains("width:100%"));
        assert!(html.contains("2 nodes, 1 edges"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_without_groups_or_physics() {
        let options = RenderOptions {
            physics: false,
            color_by_category: false,
            ..RenderOptions::default()
        };
        let html = HtmlRenderer::new(options).render(&sample_graph()).unwrap();

        assert!(!html.contains(r#""group""#));
        assert!(html.contains(r#""enabled":false"#));
    }

    #[test]
    fn test_script_injection_is_escaped() {
        let mut graph = KnowledgeGraph::new();
        graph.upsert_node(Node::new("x", "</script><script>alert(1)</script>", "T&C"));
        let options = RenderOptions {
            title: "<b>Graph</b>".to_string(),
            ..RenderOptions::default()
        };

        let html = HtmlRenderer::new(options).render(&graph).unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("\\u003c/script\\u003e"));
        assert!(html.contains("<title>&lt;b&gt;Graph&lt;/b&gt;</title>"));
        assert!(html.contains("T\\u0026C"));
    }

    #[test]
    fn test_render_empty_graph() {
        let html = HtmlRenderer::default()
            .render(&KnowledgeGraph::new())
            .unwrap();
        assert!(html.contains("new vis.DataSet([])"));
        assert!(html.contains("0 nodes, 0 edges"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("graph.html");

        let summary = HtmlRenderer::default()
            .write(&sample_graph(), &path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(summary.bytes, written.len());
        assert_eq!(summary.path, path);
        assert!(!dir.path().join("out").join("graph.html.tmp").exists());
    }

    #[test]
    fn test_write_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = HtmlRenderer::default().write(&sample_graph(), &blocker.join("graph.html"));
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}

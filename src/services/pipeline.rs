//! Load, build, render.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::instrument;

use crate::Result;
use crate::config::VisualizerConfig;
use crate::io::{Format, load_record_sets};
use crate::rendering::{HtmlRenderer, RenderOptions};
use crate::services::{BuildOptions, BuildStats, GraphBuilder};

/// Outcome of a successful [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Graph construction counters.
    pub stats: BuildStats,
    /// Path of the written document.
    pub output: PathBuf,
    /// Size of the written document in bytes.
    pub bytes: usize,
}

/// One end-to-end visualization run.
///
/// Either both tables load, the graph builds and the document is written, or
/// nothing is written.
#[derive(Debug, Clone)]
pub struct Pipeline {
    entities: PathBuf,
    relationships: PathBuf,
    format: Option<Format>,
    build: BuildOptions,
    render: RenderOptions,
    output: PathBuf,
}

impl Pipeline {
    /// Creates a pipeline with default options, writing to
    /// `graphrag_visualization.html`.
    #[must_use]
    pub fn new(entities: impl Into<PathBuf>, relationships: impl Into<PathBuf>) -> Self {
        Self::from_config(entities, relationships, &VisualizerConfig::default())
    }

    /// Creates a pipeline from loaded configuration.
    #[must_use]
    pub fn from_config(
        entities: impl Into<PathBuf>,
        relationships: impl Into<PathBuf>,
        config: &VisualizerConfig,
    ) -> Self {
        Self {
            entities: entities.into(),
            relationships: relationships.into(),
            format: config.format,
            build: config.build,
            render: config.render.clone(),
            output: config.output.clone(),
        }
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Forces an input format instead of detecting it.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the graph construction options.
    #[must_use]
    pub const fn with_build_options(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    /// Sets the document options.
    #[must_use]
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Returns the output path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first load, build or write error. The output file is not
    /// created or modified on error.
    #[instrument(
        name = "graphrag_viz.pipeline.run",
        skip(self),
        fields(
            entities = %self.entities.display(),
            relationships = %self.relationships.display(),
            output = %self.output.display()
        )
    )]
    pub fn run(&self) -> Result<PipelineReport> {
        let start = Instant::now();

        let sets = load_record_sets(&self.entities, &self.relationships, self.format)?;
        let (graph, stats) =
            GraphBuilder::new(self.build).build(&sets.entities, &sets.relationships)?;
        let summary = HtmlRenderer::new(self.render.clone()).write(&graph, &self.output)?;

        tracing::info!(
            nodes = stats.nodes,
            edges = stats.edges,
            bytes = summary.bytes,
            duration_ms = start.elapsed().as_millis(),
            "visualization written"
        );

        Ok(PipelineReport {
            stats,
            output: summary.path,
            bytes: summary.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::services::EndpointPolicy;

    fn write_inputs(dir: &Path, relationships: &str) -> (PathBuf, PathBuf) {
        let entities = dir.join("entities.csv");
        let rels = dir.join("relationships.csv");
        std::fs::write(&entities, "id,name,type\nA,Alice,PERSON\nB,,\n").unwrap();
        std::fs::write(&rels, relationships).unwrap();
        (entities, rels)
    }

    #[test]
    fn test_run_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let (entities, rels) = write_inputs(dir.path(), "source,target,predicate\nA,B,knows\n");
        let output = dir.path().join("graph.html");

        let report = Pipeline::new(&entities, &rels)
            .with_output(&output)
            .run()
            .unwrap();

        assert_eq!(report.stats.nodes, 2);
        assert_eq!(report.stats.edges, 1);
        assert_eq!(report.output, output);
        let html = std::fs::read_to_string(&output).unwrap();
        assert_eq!(html.len(), report.bytes);
        assert!(html.contains(r#""label":"Alice""#));
        assert!(html.contains(r#""title":"knows""#));
    }

    #[test]
    fn test_default_output_path() {
        let pipeline = Pipeline::new("e.parquet", "r.parquet");
        assert_eq!(pipeline.output(), Path::new("graphrag_visualization.html"));
    }

    #[test]
    fn test_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (entities, rels) = write_inputs(dir.path(), "source,target\nA,Z\n");
        let output = dir.path().join("graph.html");

        let err = Pipeline::new(&entities, &rels)
            .with_output(&output)
            .with_build_options(BuildOptions::default().with_endpoints(EndpointPolicy::Reject))
            .run()
            .unwrap_err();

        assert!(matches!(err, Error::DanglingEndpoint { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("graph.html");

        let result = Pipeline::new(dir.path().join("nope.csv"), dir.path().join("nope2.csv"))
            .with_output(&output)
            .run();

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_format_override() {
        let dir = tempfile::tempdir().unwrap();
        let entities = dir.path().join("entities.txt");
        let rels = dir.path().join("relationships.txt");
        std::fs::write(&entities, "id\nA\n").unwrap();
        std::fs::write(&rels, "source,target\nA,A\n").unwrap();

        let report = Pipeline::new(&entities, &rels)
            .with_format(Format::Csv)
            .with_output(dir.path().join("g.html"))
            .run()
            .unwrap();

        assert_eq!(report.stats.nodes, 1);
        assert_eq!(report.stats.edges, 1);
    }
}

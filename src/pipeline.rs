//! Scan, extract, project and export in one pass.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::export::{export_to_file, LayoutEngine, OutputFormat};
use crate::git::{CommitPolicy, ContributorExtractor};
use crate::graph::{GraphView, NodeKind};
use crate::scan::DirectoryScanner;

/// Fully resolved options for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory to scan.
    pub root: PathBuf,
    /// Which commits contribute authors.
    pub policy: CommitPolicy,
    /// Output format.
    pub format: OutputFormat,
    /// Layout requested in DOT output.
    pub layout: LayoutEngine,
    /// File to write.
    pub output: PathBuf,
    /// Stop after this many repositories.
    pub max_repos: Option<NonZeroUsize>,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories recorded.
    pub repositories: usize,
    /// Distinct contributors emitted.
    pub contributors: usize,
    /// Contributor to repository edges emitted.
    pub edges: usize,
    /// File written.
    pub output: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} repositories, {} contributors, {} edges written to {}",
            self.repositories,
            self.contributors,
            self.edges,
            self.output.display()
        )
    }
}

/// Runs the whole pipeline and writes the output file.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let scanner = DirectoryScanner::new(ContributorExtractor::new(config.policy.clone()))
        .with_max_repos(config.max_repos);

    let graph = scanner.scan(&config.root)?;
    let view = GraphView::from_graph(&graph);

    let exporter = config.format.exporter(config.layout);
    export_to_file(exporter.as_ref(), &view, &config.output)?;

    let summary = RunSummary {
        repositories: view.count(NodeKind::Project),
        contributors: view.count(NodeKind::Contributor),
        edges: view.edge_count(),
        output: config.output.clone(),
    };
    info!(
        format = ?config.format,
        output = %config.output.display(),
        "Graph exported"
    );

    Ok(summary)
}

//! CLI interface for git-digger.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::export::{LayoutEngine, OutputFormat};
use crate::git::{CommitPolicy, DEFAULT_SINCE};
use crate::pipeline::{self, RunConfig};
use crate::settings::Settings;

/// git-digger: graph which contributors worked on which repositories.
#[derive(Parser, Debug)]
#[command(name = "git-digger")]
#[command(about = "Dig into git repositories and graph who contributed where", long_about = None)]
#[command(version, arg_required_else_help = true)]
pub struct Cli {
    /// Directory to scan for git repositories.
    #[arg(short = 'r', long = "repo", value_name = "PATH")]
    pub repo: PathBuf,

    /// Only count commits made on or after this day, across all branches.
    #[arg(short, long, value_name = "DD/MM/YYYY", conflicts_with = "head_only")]
    pub since: Option<String>,

    /// Only count commits reachable from HEAD.
    #[arg(long)]
    pub head_only: bool,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Graphviz layout engine written into DOT output.
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutEngine>,

    /// Output file (defaults to graph.graphml or graph.dot).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Stop scanning after this many repositories.
    #[arg(long, value_name = "N")]
    pub max_repos: Option<NonZeroUsize>,

    /// Settings file to use instead of ~/.git-digger/settings.json.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        let settings = self.load_settings()?;
        let config = self.resolve(&settings)?;
        debug!(?config, "Resolved run configuration");

        let summary = pipeline::run(&config)?;
        println!("{summary}");

        Ok(())
    }

    /// Merges flags over settings over built-in defaults.
    pub fn resolve(&self, settings: &Settings) -> Result<RunConfig> {
        let policy = match (&self.since, self.head_only) {
            (Some(since), _) => CommitPolicy::Since(since.clone()),
            (None, true) => CommitPolicy::HeadOnly,
            (None, false) if settings.head_only == Some(true) => CommitPolicy::HeadOnly,
            (None, false) => CommitPolicy::Since(
                settings
                    .since
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SINCE.to_string()),
            ),
        };

        let format = match self.format {
            Some(format) => format,
            None => settings.format()?.unwrap_or_default(),
        };
        let layout = match self.layout {
            Some(layout) => layout,
            None => settings.layout()?.unwrap_or_default(),
        };
        let output = self
            .output
            .clone()
            .or_else(|| settings.output.clone())
            .unwrap_or_else(|| PathBuf::from(format.default_file_name()));

        Ok(RunConfig {
            root: self.repo.clone(),
            policy,
            format,
            layout,
            output,
            max_repos: self.max_repos,
        })
    }

    fn load_settings(&self) -> Result<Settings> {
        match &self.settings {
            Some(path) => Settings::load_from_path(path),
            None => Settings::load(),
        }
    }
}

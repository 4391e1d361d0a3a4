//! # git-digger
//!
//! Walks a directory tree, finds git repositories, collects the author
//! emails of each one and writes the resulting contributor to repository
//! graph as GraphML or Graphviz DOT.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use git_digger::git::{CommitPolicy, ContributorExtractor};
//! use git_digger::graph::GraphView;
//! use git_digger::scan::DirectoryScanner;
//!
//! let scanner = DirectoryScanner::new(ContributorExtractor::new(CommitPolicy::HeadOnly));
//! let graph = scanner.scan(Path::new("projects"))?;
//! let view = GraphView::from_graph(&graph);
//! println!("{} nodes, {} edges", view.node_count(), view.edge_count());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod error;
pub mod export;
pub mod git;
pub mod graph;
pub mod pipeline;
pub mod scan;
pub mod settings;

pub use crate::cli::Cli;
pub use crate::error::DiggerError;

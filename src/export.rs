//! Graph serialization.
//!
//! Exporters turn a finished [`GraphView`] into bytes. Writing to disk is
//! shared by all formats through [`export_to_file`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;
use crate::error::DiggerError;
use crate::graph::GraphView;

pub mod dot;
pub mod graphml;

pub use dot::{DotExporter, LayoutEngine};
pub use graphml::GraphMlExporter;

/// A serializer for contributor graphs.
pub trait GraphExporter {
    /// Writes the whole document for `view` to `out`.
    fn write_to(&self, view: &GraphView, out: &mut dyn Write) -> Result<()>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// GraphML XML.
    #[default]
    Graphml,
    /// Graphviz DOT.
    Dot,
}

impl OutputFormat {
    /// File name written in the working directory when no output is given.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Graphml => "graph.graphml",
            Self::Dot => "graph.dot",
        }
    }

    /// Builds the exporter for this format.
    pub fn exporter(self, layout: LayoutEngine) -> Box<dyn GraphExporter> {
        match self {
            Self::Graphml => Box::new(GraphMlExporter),
            Self::Dot => Box::new(DotExporter::new(layout)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DiggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| DiggerError::InvalidSetting {
            key: "format",
            value: s.to_string(),
        })
    }
}

/// Serializes `view` into `path`, truncating any existing file.
pub fn export_to_file(exporter: &dyn GraphExporter, view: &GraphView, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    exporter
        .write_to(view, &mut writer)
        .with_context(|| format!("Failed to encode graph into {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}

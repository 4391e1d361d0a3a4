//! Graphviz DOT writer.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use clap::ValueEnum;

use crate::error::DiggerError;
use crate::export::GraphExporter;
use crate::graph::GraphView;

/// Graphviz layout engines, emitted as the graph `layout` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LayoutEngine {
    /// Hierarchical.
    Dot,
    /// Spring model.
    Neato,
    /// Force directed.
    Fdp,
    /// Scalable force directed.
    Sfdp,
    /// Circular.
    #[default]
    Circo,
    /// Radial.
    Twopi,
    /// Clustered squares.
    Osage,
    /// Squarified treemap.
    Patchwork,
}

impl LayoutEngine {
    /// Engine name as Graphviz spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Neato => "neato",
            Self::Fdp => "fdp",
            Self::Sfdp => "sfdp",
            Self::Circo => "circo",
            Self::Twopi => "twopi",
            Self::Osage => "osage",
            Self::Patchwork => "patchwork",
        }
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutEngine {
    type Err = DiggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| DiggerError::InvalidSetting {
            key: "layout",
            value: s.to_string(),
        })
    }
}

/// Writes a directed DOT graph with plain nodes and edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotExporter {
    layout: LayoutEngine,
}

impl DotExporter {
    /// Creates an exporter that requests `layout` from Graphviz.
    pub fn new(layout: LayoutEngine) -> Self {
        Self { layout }
    }
}

impl GraphExporter for DotExporter {
    fn write_to(&self, view: &GraphView, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "digraph contributors {{")?;
        writeln!(out, "  layout={};", quote(self.layout.as_str()))?;

        for node in view.nodes() {
            writeln!(out, "  {};", quote(&node.id))?;
        }
        for edge in view.edges() {
            writeln!(out, "  {} -> {};", quote(edge.source), quote(edge.target))?;
        }

        writeln!(out, "}}")?;

        Ok(())
    }
}

/// Quotes a DOT identifier. Inside a quoted ID only `"` is escaped.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('"', "\\\""))
}

//! Contributor graph model.
//!
//! [`ContributorGraph`] is what the scan produces: one entry per opened
//! repository. [`GraphView`] is the bipartite node/edge projection handed to
//! the exporters.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::git::ContributorSet;

/// Repository path to the contributors seen in it.
///
/// Keys only exist for repositories that opened successfully. Ordering is
/// lexicographic so projections are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorGraph {
    repositories: BTreeMap<String, ContributorSet>,
}

impl ContributorGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a repository and its contributors, replacing any previous entry.
    pub fn record(&mut self, repository: impl Into<String>, contributors: ContributorSet) {
        self.repositories.insert(repository.into(), contributors);
    }

    /// Number of recorded repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether no repository was recorded.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Recorded repository paths in order.
    pub fn repositories(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }

    /// Contributors of one repository, if recorded.
    pub fn contributors(&self, repository: &str) -> Option<&ContributorSet> {
        self.repositories.get(repository)
    }

    /// Iterates over `(repository, contributors)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContributorSet)> {
        self.repositories
            .iter()
            .map(|(repo, contributors)| (repo.as_str(), contributors))
    }
}

/// Kind of a node in the exported graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A repository.
    Project,
    /// An author email.
    Contributor,
}

impl NodeKind {
    /// Name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Contributor => "contributor",
        }
    }
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Repository path or contributor email.
    pub id: String,
    /// What the node stands for.
    pub kind: NodeKind,
}

/// A contributor to repository edge, borrowed from a [`GraphView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    /// Contributor node id.
    pub source: &'a str,
    /// Project node id.
    pub target: &'a str,
}

/// Directed bipartite projection of a [`ContributorGraph`].
///
/// Order: repositories lexicographically, each project node followed by its
/// contributors not yet added, also lexicographic. Edges follow the same
/// traversal. Empty identifiers never produce nodes or edges.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    graph: DiGraph<Node, ()>,
}

impl GraphView {
    /// Projects a contributor graph into nodes and edges.
    pub fn from_graph(graph: &ContributorGraph) -> Self {
        let mut digraph = DiGraph::new();
        let mut contributor_nodes: HashMap<&str, NodeIndex> = HashMap::new();

        for (repo, contributors) in graph.iter() {
            if repo.is_empty() {
                continue;
            }
            let project = digraph.add_node(Node {
                id: repo.to_string(),
                kind: NodeKind::Project,
            });

            for contributor in contributors {
                if contributor.is_empty() {
                    continue;
                }
                let source = *contributor_nodes
                    .entry(contributor.as_str())
                    .or_insert_with(|| {
                        digraph.add_node(Node {
                            id: contributor.clone(),
                            kind: NodeKind::Contributor,
                        })
                    });
                digraph.add_edge(source, project, ());
            }
        }

        Self { graph: digraph }
    }

    /// The underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<Node, ()> {
        &self.graph
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.graph.edge_references().map(|edge| Edge {
            source: &self.graph[edge.source()].id,
            target: &self.graph[edge.target()].id,
        })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of nodes of the given kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes().filter(|node| node.kind == kind).count()
    }

    /// Whether the view holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node ids of the given kind, sorted.
    pub fn ids(&self, kind: NodeKind) -> BTreeSet<&str> {
        self.nodes()
            .filter(|node| node.kind == kind)
            .map(|node| node.id.as_str())
            .collect()
    }
}

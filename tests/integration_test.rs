use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Result;
use git2::{Oid, Repository, Signature, Time};
use git_digger::export::{GraphExporter, GraphMlExporter, LayoutEngine, OutputFormat};
use git_digger::git::{CommitPolicy, ContributorExtractor, ContributorSet};
use git_digger::graph::{ContributorGraph, GraphView, NodeKind};
use git_digger::pipeline::{run, RunConfig};
use git_digger::scan::DirectoryScanner;
use tempfile::TempDir;

/// 2023-11-14T22:13:20Z
const RECENT: i64 = 1_700_000_000;

/// A git repository inside the scanned tree with commits by chosen authors.
struct TestRepo {
    repo: Repository,
}

impl TestRepo {
    fn init(path: &Path) -> Result<Self> {
        fs::create_dir_all(path)?;
        let repo = Repository::init(path)?;
        Ok(TestRepo { repo })
    }

    /// Commits onto HEAD as `email` at `seconds` since the epoch.
    fn commit_as(&self, email: &str, seconds: i64) -> Result<Oid> {
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.commit(Some("HEAD"), email, seconds, &parents)
    }

    /// Commits onto `branch` without moving HEAD.
    fn commit_on_branch(&self, branch: &str, parent: Oid, email: &str) -> Result<Oid> {
        let parent = self.repo.find_commit(parent)?;
        self.commit(
            Some(&format!("refs/heads/{branch}")),
            email,
            RECENT + 1_000,
            &[&parent],
        )
    }

    fn commit(
        &self,
        update_ref: Option<&str>,
        email: &str,
        seconds: i64,
        parents: &[&git2::Commit],
    ) -> Result<Oid> {
        let signature = Signature::new("Test User", email, &Time::new(seconds, 0))?;
        let tree_id = self.repo.index()?.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let oid = self.repo.commit(
            update_ref,
            &signature,
            &signature,
            &format!("Commit by {email}"),
            &tree,
            parents,
        )?;
        Ok(oid)
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn emails(list: &[&str]) -> ContributorSet {
    list.iter().map(|e| (*e).to_string()).collect()
}

fn scan(root: &Path, policy: CommitPolicy) -> Result<ContributorGraph> {
    DirectoryScanner::new(ContributorExtractor::new(policy)).scan(root)
}

/// Root with /A (alice, bob) and /B (alice).
fn two_repository_tree() -> Result<TempDir> {
    let root = tempfile::tempdir()?;

    let a = TestRepo::init(&root.path().join("A"))?;
    a.commit_as("alice@x.com", RECENT)?;
    a.commit_as("bob@x.com", RECENT + 60)?;
    a.commit_as("alice@x.com", RECENT + 120)?;

    let b = TestRepo::init(&root.path().join("B"))?;
    b.commit_as("alice@x.com", RECENT)?;

    fs::create_dir_all(root.path().join("docs").join("notes"))?;
    fs::write(root.path().join("docs").join("README.md"), "not a repository")?;

    Ok(root)
}

#[test]
fn shared_contributor_links_both_repositories() -> Result<()> {
    let root = two_repository_tree()?;

    for policy in [CommitPolicy::default(), CommitPolicy::HeadOnly] {
        let graph = scan(root.path(), policy)?;

        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.contributors(&key(&root.path().join("A"))),
            Some(&emails(&["alice@x.com", "bob@x.com"]))
        );
        assert_eq!(
            graph.contributors(&key(&root.path().join("B"))),
            Some(&emails(&["alice@x.com"]))
        );

        let view = GraphView::from_graph(&graph);
        assert_eq!(view.count(NodeKind::Project), 2);
        assert_eq!(
            view.ids(NodeKind::Contributor).into_iter().collect::<Vec<_>>(),
            vec!["alice@x.com", "bob@x.com"]
        );
        assert_eq!(view.edge_count(), 3);
    }

    Ok(())
}

#[test]
fn tree_without_repositories_yields_empty_graph() -> Result<()> {
    let root = tempfile::tempdir()?;
    fs::create_dir_all(root.path().join("a").join("b"))?;
    fs::write(root.path().join("a").join("file.txt"), "x")?;

    let graph = scan(root.path(), CommitPolicy::default())?;
    let view = GraphView::from_graph(&graph);

    assert!(view.is_empty());
    assert_eq!(view.edge_count(), 0);
    Ok(())
}

#[test]
fn nested_repository_is_not_reported() -> Result<()> {
    let root = tempfile::tempdir()?;

    let outer = TestRepo::init(&root.path().join("outer"))?;
    outer.commit_as("alice@x.com", RECENT)?;

    let inner_path = root.path().join("outer").join("vendor").join("inner");
    let inner = TestRepo::init(&inner_path)?;
    inner.commit_as("carol@x.com", RECENT)?;

    let graph = scan(root.path(), CommitPolicy::HeadOnly)?;

    assert_eq!(
        graph.repositories().collect::<Vec<_>>(),
        vec![key(&root.path().join("outer"))]
    );
    let view = GraphView::from_graph(&graph);
    assert!(!view.ids(NodeKind::Contributor).contains("carol@x.com"));
    Ok(())
}

#[test]
fn root_repository_prunes_everything_below() -> Result<()> {
    let root = tempfile::tempdir()?;
    let top = TestRepo::init(root.path())?;
    top.commit_as("alice@x.com", RECENT)?;
    TestRepo::init(&root.path().join("sub"))?.commit_as("bob@x.com", RECENT)?;

    let graph = scan(root.path(), CommitPolicy::HeadOnly)?;

    assert_eq!(graph.len(), 1);
    assert_eq!(
        graph.contributors(&key(root.path())),
        Some(&emails(&["alice@x.com"]))
    );
    Ok(())
}

#[test]
fn invalid_since_date_keeps_repository_without_contributors() -> Result<()> {
    let root = two_repository_tree()?;
    let output = root.path().join("graph.graphml");

    let summary = run(&RunConfig {
        root: root.path().to_path_buf(),
        policy: CommitPolicy::Since("31/02/2023".to_string()),
        format: OutputFormat::Graphml,
        layout: LayoutEngine::default(),
        output: output.clone(),
        max_repos: None,
    })?;

    assert_eq!(summary.repositories, 2);
    assert_eq!(summary.contributors, 0);
    assert_eq!(summary.edges, 0);

    let xml = fs::read_to_string(&output)?;
    assert!(xml.contains(&format!(
        r#"<node id="{}" type="project"/>"#,
        key(&root.path().join("A"))
    )));
    assert!(!xml.contains("<edge"));
    Ok(())
}

#[test]
fn empty_repository_under_head_only_has_no_edges() -> Result<()> {
    let root = tempfile::tempdir()?;
    TestRepo::init(&root.path().join("fresh"))?;

    let graph = scan(root.path(), CommitPolicy::HeadOnly)?;
    let view = GraphView::from_graph(&graph);

    assert_eq!(view.count(NodeKind::Project), 1);
    assert_eq!(view.count(NodeKind::Contributor), 0);
    assert_eq!(view.edge_count(), 0);
    Ok(())
}

#[test]
fn since_policy_covers_all_branches_but_head_only_does_not() -> Result<()> {
    let root = tempfile::tempdir()?;
    let repo = TestRepo::init(&root.path().join("project"))?;
    let base = repo.commit_as("alice@x.com", RECENT)?;
    repo.commit_on_branch("feature", base, "dave@x.com")?;
    let project = key(&root.path().join("project"));

    let since = scan(root.path(), CommitPolicy::Since("01/01/2023".to_string()))?;
    assert_eq!(
        since.contributors(&project),
        Some(&emails(&["alice@x.com", "dave@x.com"]))
    );

    let head_only = scan(root.path(), CommitPolicy::HeadOnly)?;
    assert_eq!(
        head_only.contributors(&project),
        Some(&emails(&["alice@x.com"]))
    );
    Ok(())
}

#[test]
fn since_date_is_inclusive_of_the_whole_day() -> Result<()> {
    let root = tempfile::tempdir()?;
    let repo = TestRepo::init(&root.path().join("project"))?;
    // 2023-11-13T23:59:59Z and 2023-11-14T00:00:00Z
    repo.commit_as("before@x.com", 1_699_919_999)?;
    repo.commit_as("midnight@x.com", 1_699_920_000)?;

    let graph = scan(root.path(), CommitPolicy::Since("14/11/2023".to_string()))?;

    assert_eq!(
        graph.contributors(&key(&root.path().join("project"))),
        Some(&emails(&["midnight@x.com"]))
    );
    Ok(())
}

#[test]
fn max_repos_stops_the_scan() -> Result<()> {
    let root = tempfile::tempdir()?;
    for name in ["a", "b", "c"] {
        TestRepo::init(&root.path().join(name))?.commit_as("alice@x.com", RECENT)?;
    }

    let graph = DirectoryScanner::new(ContributorExtractor::new(CommitPolicy::HeadOnly))
        .with_max_repos(NonZeroUsize::new(2))
        .scan(root.path())?;

    assert_eq!(
        graph.repositories().collect::<Vec<_>>(),
        vec![key(&root.path().join("a")), key(&root.path().join("b"))]
    );
    Ok(())
}

#[test]
fn rerun_produces_identical_output() -> Result<()> {
    let root = two_repository_tree()?;
    let out_dir = tempfile::tempdir()?;

    let mut outputs = Vec::new();
    for name in ["first.dot", "second.dot"] {
        let output: PathBuf = out_dir.path().join(name);
        run(&RunConfig {
            root: root.path().to_path_buf(),
            policy: CommitPolicy::default(),
            format: OutputFormat::Dot,
            layout: LayoutEngine::Circo,
            output: output.clone(),
            max_repos: None,
        })?;
        outputs.push(fs::read_to_string(output)?);
    }

    assert_eq!(outputs[0], outputs[1]);
    assert!(outputs[0].contains("layout=\"circo\";"));
    assert!(outputs[0].contains(&format!(
        "\"bob@x.com\" -> \"{}\";",
        key(&root.path().join("A"))
    )));
    Ok(())
}

#[test]
fn graphml_for_two_repositories() -> Result<()> {
    let mut graph = ContributorGraph::new();
    graph.record("/A", emails(&["alice@x.com", "bob@x.com"]));
    graph.record("/B", emails(&["alice@x.com"]));

    let mut out = Vec::new();
    GraphMlExporter.write_to(&GraphView::from_graph(&graph), &mut out)?;
    let xml = String::from_utf8(out)?;

    insta::assert_snapshot!("graphml_two_repositories", xml);
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_repository_is_recorded() -> Result<()> {
    let elsewhere = tempfile::tempdir()?;
    TestRepo::init(&elsewhere.path().join("real"))?.commit_as("alice@x.com", RECENT)?;

    let root = tempfile::tempdir()?;
    let link = root.path().join("link");
    std::os::unix::fs::symlink(elsewhere.path().join("real"), &link)?;

    let graph = scan(root.path(), CommitPolicy::HeadOnly)?;

    assert_eq!(graph.repositories().collect::<Vec<_>>(), vec![key(&link)]);
    assert_eq!(graph.contributors(&key(&link)), Some(&emails(&["alice@x.com"])));
    Ok(())
}

#[test]
fn repository_with_missing_objects_is_recorded_empty() -> Result<()> {
    let root = two_repository_tree()?;

    // Drop the commit object B's branch points at
    let b_path = root.path().join("B");
    let head = Repository::open(&b_path)?
        .head()?
        .target()
        .map(|oid| oid.to_string())
        .unwrap_or_default();
    fs::remove_file(
        b_path
            .join(".git")
            .join("objects")
            .join(&head[..2])
            .join(&head[2..]),
    )?;

    for policy in [CommitPolicy::default(), CommitPolicy::HeadOnly] {
        let graph = scan(root.path(), policy)?;

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.contributors(&key(&b_path)), Some(&ContributorSet::new()));
        assert_eq!(
            graph.contributors(&key(&root.path().join("A"))),
            Some(&emails(&["alice@x.com", "bob@x.com"]))
        );
    }
    Ok(())
}

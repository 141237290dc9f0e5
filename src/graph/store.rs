use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info, warn};
use thiserror::Error;

use super::model::{DirectoryRecord, Edge, FileRecord, GraphData, Node, NodeKind, Subgraph};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("duplicate node id `{0}` in graph data; the data source is corrupt")]
    DuplicateNodeId(String),
}

/// Counts for the header bar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphOverview {
    pub symbols: usize,
    pub files: usize,
    pub edges: usize,
    pub dangling_edges: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
    /// From file records only; files known just through symbols have no
    /// language.
    pub by_language: BTreeMap<String, usize>,
}

/// The authoritative, session-long node/edge collections.
#[derive(Clone, Debug, Default)]
pub struct GraphDataStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_id: HashMap<String, usize>,
    files: Vec<FileRecord>,
    file_by_path: HashMap<String, usize>,
    directory_summaries: HashMap<String, String>,
}

impl GraphDataStore {
    pub fn from_data(data: GraphData) -> Result<Self, LoadError> {
        let mut store = Self::default();
        store.load(data.nodes, data.edges)?;
        store.annotate(data.files, data.directories);
        Ok(store)
    }

    /// Replaces the file records and directory summaries. A path listed
    /// twice keeps its last record.
    fn annotate(&mut self, files: Vec<FileRecord>, directories: Vec<DirectoryRecord>) {
        let mut file_by_path = HashMap::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            if file_by_path.insert(file.path.clone(), index).is_some() {
                warn!("file {} is listed more than once; keeping the last record", file.path);
            }
        }

        self.directory_summaries = directories
            .into_iter()
            .filter_map(|directory| {
                let summary = directory.summary?;
                Some((normalize_dir(&directory.path).to_owned(), summary))
            })
            .collect();
        debug!(
            "loaded {} file records and {} directory summaries",
            files.len(),
            self.directory_summaries.len()
        );
        self.files = files;
        self.file_by_path = file_by_path;
    }

    /// Replaces nodes, edges and the index. On error the store is left
    /// untouched.
    pub fn load(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(), LoadError> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), index).is_some() {
                return Err(LoadError::DuplicateNodeId(node.id.clone()));
            }
        }

        let dangling = edges
            .iter()
            .filter(|edge| !by_id.contains_key(&edge.source) || !by_id.contains_key(&edge.target))
            .count();
        if dangling > 0 {
            info!("{dangling} edges reference unknown symbols and will not be drawn");
        }
        debug!("loaded {} nodes and {} edges", nodes.len(), edges.len());

        self.nodes = nodes;
        self.edges = edges;
        self.by_id = by_id;
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.file_by_path.get(path).map(|&index| &self.files[index])
    }

    pub fn directory_summary(&self, path: &str) -> Option<&str> {
        self.directory_summaries
            .get(normalize_dir(path))
            .map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The whole collection as fresh clones, ready to be laid out again.
    pub fn fresh_subgraph(&self) -> Subgraph {
        Subgraph {
            nodes: self.nodes.iter().map(Node::fresh_clone).collect(),
            edges: self.edges.clone(),
        }
    }

    pub fn max_pagerank(&self) -> f64 {
        self.nodes
            .iter()
            .map(|node| node.pagerank)
            .fold(0.0, f64::max)
    }

    pub fn callers(&self, id: &str) -> Vec<&Node> {
        self.neighbors(id, |edge| (edge.target == id).then_some(edge.source.as_str()))
    }

    pub fn callees(&self, id: &str) -> Vec<&Node> {
        self.neighbors(id, |edge| (edge.source == id).then_some(edge.target.as_str()))
    }

    fn neighbors<'a>(
        &'a self,
        id: &str,
        other_end: impl Fn(&'a Edge) -> Option<&'a str>,
    ) -> Vec<&'a Node> {
        if !self.contains(id) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter_map(other_end)
            .filter(|other| *other != id && seen.insert(*other))
            .filter_map(|other| self.get(other))
            .collect()
    }

    pub fn symbols_in_file(&self, path: &str) -> Vec<&Node> {
        let mut symbols = self
            .nodes
            .iter()
            .filter(|node| node.file_path == path)
            .collect::<Vec<_>>();
        symbols.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.name.cmp(&b.name)));
        symbols
    }

    pub fn overview(&self) -> GraphOverview {
        let mut by_kind = NodeKind::ALL
            .iter()
            .map(|kind| (kind.label(), 0usize))
            .collect::<BTreeMap<_, _>>();
        for node in &self.nodes {
            *by_kind.entry(node.kind.label()).or_default() += 1;
        }

        let files = self
            .nodes
            .iter()
            .map(|node| node.file_path.as_str())
            .chain(self.files.iter().map(|file| file.path.as_str()))
            .collect::<HashSet<_>>()
            .len();
        let mut by_language = BTreeMap::new();
        for file in &self.files {
            if let Some(language) = &file.language {
                *by_language.entry(language.clone()).or_default() += 1;
            }
        }
        let dangling_edges = self
            .edges
            .iter()
            .filter(|edge| !self.contains(&edge.source) || !self.contains(&edge.target))
            .count();

        GraphOverview {
            symbols: self.nodes.len(),
            files,
            edges: self.edges.len() - dangling_edges,
            dangling_edges,
            by_kind,
            by_language,
        }
    }
}

fn normalize_dir(path: &str) -> &str {
    let path = path.trim_end_matches(['/', '\\']);
    path.strip_prefix("./").unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::EdgeKind;

    fn node(id: &str, file: &str, line: u32) -> Node {
        let mut node = Node::new(id, id, NodeKind::Function);
        node.file_path = file.to_owned();
        node.line = Some(line);
        node
    }

    fn sample() -> GraphDataStore {
        let nodes = vec![node("a", "x.py", 5), node("b", "x.py", 1), node("c", "y.py", 3)];
        let edges = vec![
            Edge::new("a", "b", EdgeKind::Calls),
            Edge::new("c", "b", EdgeKind::Calls),
            Edge::new("a", "b", EdgeKind::Imports),
            Edge::new("b", "missing", EdgeKind::Calls),
        ];
        GraphDataStore::from_data(GraphData {
            nodes,
            edges,
            files: vec![
                FileRecord {
                    path: "x.py".to_owned(),
                    language: Some("python".to_owned()),
                    line_count: Some(120),
                    summary: Some("Parsing helpers.".to_owned()),
                },
                FileRecord {
                    path: "empty.py".to_owned(),
                    language: Some("python".to_owned()),
                    ..FileRecord::default()
                },
            ],
            directories: vec![DirectoryRecord {
                path: "./pkg/".to_owned(),
                summary: Some("Core package.".to_owned()),
            }],
        })
        .expect("valid data")
    }

    #[test]
    fn duplicate_ids_fail_fast_and_leave_store_intact() {
        let mut store = sample();
        let error = store
            .load(vec![node("d", "z.py", 1), node("d", "z.py", 2)], Vec::new())
            .expect_err("duplicate must be rejected");

        assert_eq!(error, LoadError::DuplicateNodeId("d".to_owned()));
        assert_eq!(store.node_count(), 3);
        assert!(store.get("a").is_some());
    }

    #[test]
    fn get_reports_missing_ids() {
        let store = sample();
        assert_eq!(store.get("c").map(|node| node.id.as_str()), Some("c"));
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn callers_and_callees_are_deduplicated_and_resolved() {
        let store = sample();
        let callers = store.callers("b").into_iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        let callees = store.callees("b").into_iter().map(|n| n.id.as_str()).collect::<Vec<_>>();

        assert_eq!(callers, vec!["a", "c"]);
        assert!(callees.is_empty());
        assert!(store.callers("missing").is_empty());
    }

    #[test]
    fn symbols_in_file_are_ordered_by_line() {
        let store = sample();
        let ids = store
            .symbols_in_file("x.py")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn file_records_and_directory_summaries_are_looked_up_by_path() {
        let store = sample();
        let file = store.file("x.py").expect("recorded");
        assert_eq!(file.line_count, Some(120));
        assert_eq!(file.summary.as_deref(), Some("Parsing helpers."));
        assert!(store.file("y.py").is_none());

        assert_eq!(store.directory_summary("pkg"), Some("Core package."));
        assert_eq!(store.directory_summary("pkg/"), Some("Core package."));
        assert_eq!(store.directory_summary("other"), None);
    }

    #[test]
    fn overview_counts_dangling_edges_separately() {
        let overview = sample().overview();
        assert_eq!(overview.symbols, 3);
        assert_eq!(overview.files, 3);
        assert_eq!(overview.by_language.get("python"), Some(&2));
        assert_eq!(overview.edges, 3);
        assert_eq!(overview.dangling_edges, 1);
        assert_eq!(overview.by_kind.get("function"), Some(&3));
        assert_eq!(overview.by_kind.get("class"), Some(&0));
    }
}

use eframe::egui::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Class,
    Function,
    Method,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
        }
    }

    pub const ALL: [NodeKind; 3] = [Self::Class, Self::Function, Self::Method];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Calls,
    Imports,
    Inherits,
    #[serde(other)]
    Other,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Calls => "calls",
            Self::Imports => "imports",
            Self::Inherits => "inherits",
            Self::Other => "other",
        }
    }
}

/// One symbol as a graph node.
///
/// The snapshot fields come from the data source and never change during a
/// session. `position`, `velocity` and `pin` belong to the layout and are not
/// serialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub qualified_name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub file_path: String,
    #[serde(default, alias = "startLine")]
    pub line: Option<u32>,
    #[serde(default)]
    pub end_line: Option<u32>,
    #[serde(default)]
    pub pagerank: f64,
    #[serde(default)]
    pub betweenness: f64,
    #[serde(default)]
    pub in_degree: u32,
    #[serde(default)]
    pub out_degree: u32,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(skip)]
    pub position: Option<Vec2>,
    #[serde(skip)]
    pub velocity: Vec2,
    #[serde(skip)]
    pub pin: Option<Vec2>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            qualified_name: name.clone(),
            name,
            kind,
            file_path: String::new(),
            line: None,
            end_line: None,
            pagerank: 0.0,
            betweenness: 0.0,
            in_degree: 0,
            out_degree: 0,
            signature: None,
            summary: None,
            position: None,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    /// Clone with every layout field reset, so a new simulation seeds it
    /// from scratch.
    pub fn fresh_clone(&self) -> Self {
        Self {
            position: None,
            velocity: Vec2::ZERO,
            pin: None,
            ..self.clone()
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    /// True when both nodes carry the same snapshot data; layout state is
    /// ignored.
    pub fn same_snapshot(&self, other: &Node) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.qualified_name == other.qualified_name
            && self.kind == other.kind
            && self.file_path == other.file_path
            && self.line == other.line
            && self.end_line == other.end_line
            && self.pagerank.to_bits() == other.pagerank.to_bits()
            && self.betweenness.to_bits() == other.betweenness.to_bits()
            && self.in_degree == other.in_degree
            && self.out_degree == other.out_degree
            && self.signature == other.signature
            && self.summary == other.summary
    }
}

/// Directed reference between two symbols, endpoints as bare ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Per-file facts from the indexer. Optional in the document; files that
/// only appear through their symbols have none.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub line_count: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub path: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// The dataset document: `{ "nodes": [...], "edges": [...] }`, optionally
/// with `files` and `directories` sections.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub directories: Vec<DirectoryRecord>,
}

/// A node/edge subset handed to the layout. Always replaced wholesale, never
/// patched in place.
#[derive(Clone, Debug, Default)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Subgraph {
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_deserializes_from_camel_case_document() {
        let raw = r#"{
            "id": "pkg/mod.py::Parser.parse",
            "name": "parse",
            "qualifiedName": "Parser.parse",
            "kind": "method",
            "filePath": "pkg/mod.py",
            "line": 12,
            "pagerank": 0.02,
            "betweenness": 0.1,
            "inDegree": 3,
            "outDegree": 1,
            "signature": "def parse(self, text: str) -> Tree",
            "summary": "Parses one module."
        }"#;

        let node: Node = serde_json::from_str(raw).expect("node parses");
        assert_eq!(node.qualified_name, "Parser.parse");
        assert_eq!(node.kind, NodeKind::Method);
        assert_eq!(node.line, Some(12));
        assert_eq!(node.in_degree, 3);
        assert_eq!(node.signature.as_deref(), Some("def parse(self, text: str) -> Tree"));
        assert_eq!(node.summary.as_deref(), Some("Parses one module."));
        assert!(node.position.is_none());
        assert!(!node.is_pinned());
    }

    #[test]
    fn unknown_edge_kind_maps_to_other() {
        let edge: Edge =
            serde_json::from_str(r#"{"source":"a","target":"b","kind":"decorates"}"#)
                .expect("edge parses");
        assert_eq!(edge.kind, EdgeKind::Other);
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a", "b"));
    }

    #[test]
    fn fresh_clone_clears_layout_state_only() {
        let mut node = Node::new("a", "a", NodeKind::Function);
        node.pagerank = 0.4;
        node.position = Some(Vec2::new(3.0, 4.0));
        node.velocity = Vec2::new(1.0, 1.0);
        node.pin = Some(Vec2::new(3.0, 4.0));

        let fresh = node.fresh_clone();
        assert!(fresh.position.is_none());
        assert_eq!(fresh.velocity, Vec2::ZERO);
        assert!(fresh.pin.is_none());
        assert!(fresh.same_snapshot(&node));
    }
}

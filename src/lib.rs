//! Graph visualization and cross-view selection engine for a codebase's
//! symbol-dependency graph.
//!
//! [`engine::GraphEngine`] is the owned context object: it holds the loaded
//! graph, the running layout, the selection state and the viewport. Input
//! arrives through typed methods so the engine stays independent of the
//! toolkit that renders it.

pub mod config;
pub mod engine;
pub mod graph;
pub mod highlight;
pub mod layout;
pub mod search;
pub mod selection;
pub mod source;
pub mod sync;
pub mod tree;
pub mod util;
pub mod viewport;

pub use engine::{EngineOptions, GraphEngine, SelectOutcome};
pub use graph::{
    DirectoryRecord, Edge, EdgeKind, FileRecord, GraphData, LoadError, Node, NodeKind, Subgraph,
};

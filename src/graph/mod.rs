mod filter;
mod model;
mod store;

pub use filter::filter_neighborhood;
pub use model::{DirectoryRecord, Edge, EdgeKind, FileRecord, GraphData, Node, NodeKind, Subgraph};
pub use store::{GraphDataStore, GraphOverview, LoadError};

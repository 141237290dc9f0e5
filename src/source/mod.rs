mod dataset;
mod excerpt;

use std::path::PathBuf;

use thiserror::Error;

pub use dataset::{GraphSource, load_graph, parse_graph};
pub use excerpt::{Excerpt, read_excerpt};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid graph document")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} lies outside the source root")]
    OutsideRoot(PathBuf),
}

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use log::{info, warn};

use super::SourceError;
use crate::graph::GraphData;

/// Where the graph document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphSource {
    File(PathBuf),
    Stdin,
}

impl GraphSource {
    /// `-` means stdin, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

pub fn load_graph(source: &GraphSource) -> Result<GraphData, SourceError> {
    let raw = match source {
        GraphSource::File(path) => fs::read_to_string(path),
        GraphSource::Stdin => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).map(|_| raw)
        }
    }
    .map_err(|source_error| SourceError::Io {
        path: source.to_string(),
        source: source_error,
    })?;

    let data = parse_graph(&raw, &source.to_string())?;
    info!(
        "read {} symbols, {} edges and {} file records from {source}",
        data.nodes.len(),
        data.edges.len(),
        data.files.len()
    );
    Ok(data)
}

/// Parses a graph document. `origin` only names the input in errors.
pub fn parse_graph(raw: &str, origin: &str) -> Result<GraphData, SourceError> {
    let data: GraphData = serde_json::from_str(raw).map_err(|source| SourceError::Json {
        path: origin.to_owned(),
        source,
    })?;

    let negative = data
        .nodes
        .iter()
        .filter(|node| node.pagerank < 0.0 || node.betweenness < 0.0)
        .count();
    if negative > 0 {
        warn!("{negative} symbols in {origin} carry negative centrality scores");
    }
    Ok(data)
}

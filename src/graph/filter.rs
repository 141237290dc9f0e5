use std::collections::HashSet;

use log::debug;

use super::model::{Edge, Node, Subgraph};

/// Focus node plus everything one edge away from it, in either direction.
///
/// Nodes come back as fresh clones in input order. Edges are kept when both
/// endpoints are among the returned nodes, so an edge pointing at an id that
/// is not a node never survives. The input slices are not modified.
pub fn filter_neighborhood(focus_id: &str, nodes: &[Node], edges: &[Edge]) -> Subgraph {
    let mut neighbor_ids = HashSet::from([focus_id]);
    for edge in edges {
        if edge.source == focus_id {
            neighbor_ids.insert(edge.target.as_str());
        } else if edge.target == focus_id {
            neighbor_ids.insert(edge.source.as_str());
        }
    }

    let sub_nodes = nodes
        .iter()
        .filter(|node| neighbor_ids.contains(node.id.as_str()))
        .map(Node::fresh_clone)
        .collect::<Vec<_>>();

    let kept = sub_nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();
    let sub_edges = edges
        .iter()
        .filter(|edge| kept.contains(edge.source.as_str()) && kept.contains(edge.target.as_str()))
        .cloned()
        .collect::<Vec<_>>();

    debug!(
        "neighborhood of {focus_id}: {} nodes, {} edges",
        sub_nodes.len(),
        sub_edges.len()
    );

    Subgraph {
        nodes: sub_nodes,
        edges: sub_edges,
    }
}

use std::cmp::Reverse;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::Node;

pub const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Copy, Debug)]
pub struct SearchHit<'a> {
    pub node: &'a Node,
    pub score: i64,
}

/// Case-insensitive fuzzy search over symbol names and qualified names,
/// best match first.
pub fn search<'a>(nodes: &'a [Node], query: &str, limit: usize) -> Vec<SearchHit<'a>> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits = nodes
        .iter()
        .filter_map(|node| {
            let score = matcher
                .fuzzy_match(&node.name, query)
                .max(matcher.fuzzy_match(&node.qualified_name, query))?;
            Some(SearchHit { node, score })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| {
        Reverse(a.score)
            .cmp(&Reverse(b.score))
            .then(a.node.name.len().cmp(&b.node.name.len()))
            .then(b.node.pagerank.total_cmp(&a.node.pagerank))
            .then(a.node.id.cmp(&b.node.id))
    });
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn node(name: &str, qualified: &str) -> Node {
        let mut node = Node::new(format!("m.py::{qualified}"), name, NodeKind::Function);
        node.qualified_name = qualified.to_owned();
        node
    }

    fn names<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|hit| hit.node.name.as_str()).collect()
    }

    #[test]
    fn contiguous_match_ranks_first_and_non_matches_are_dropped() {
        let nodes = vec![
            node("lxxxxoxxxxaxxxxd", "lxxxxoxxxxaxxxxd"),
            node("parse", "parse"),
            node("load_graph", "store.load_graph"),
        ];
        let hits = search(&nodes, "load", DEFAULT_LIMIT);
        assert_eq!(names(&hits), vec!["load_graph", "lxxxxoxxxxaxxxxd"]);
    }

    #[test]
    fn matching_ignores_case_and_covers_qualified_names() {
        let nodes = vec![node("run", "Engine.run")];
        assert_eq!(search(&nodes, "ENGINE", DEFAULT_LIMIT).len(), 1);
        assert_eq!(search(&nodes, "Run", DEFAULT_LIMIT).len(), 1);
    }

    #[test]
    fn results_are_capped_and_blank_queries_match_nothing() {
        let nodes = (0..40)
            .map(|index| node(&format!("handler_{index}"), &format!("handler_{index}")))
            .collect::<Vec<_>>();
        assert_eq!(search(&nodes, "handler", DEFAULT_LIMIT).len(), DEFAULT_LIMIT);
        assert!(search(&nodes, "   ", DEFAULT_LIMIT).is_empty());
    }
}

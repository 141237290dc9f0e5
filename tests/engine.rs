//! Engine scenarios: loading, selection, neighborhood filtering and reset,
//! driven only through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use symgraph_explorer::selection::SelectionPhase;
use symgraph_explorer::{
    Edge, EdgeKind, EngineOptions, GraphData, GraphEngine, LoadError, Node, NodeKind, SelectOutcome,
};

type Notifications = Rc<RefCell<Vec<Option<String>>>>;

fn node(id: &str, pagerank: f64) -> Node {
    let mut node = Node::new(id, id, NodeKind::Function);
    node.file_path = format!("{}.py", id.to_lowercase());
    node.pagerank = pagerank;
    node.in_degree = 1;
    node
}

/// nodes A, B, C, D with A→B and B→C.
fn abcd() -> GraphData {
    GraphData {
        nodes: vec![node("A", 0.1), node("B", 0.4), node("C", 0.2), node("D", 0.3)],
        edges: vec![
            Edge::new("A", "B", EdgeKind::Calls),
            Edge::new("B", "C", EdgeKind::Calls),
        ],
        ..GraphData::default()
    }
}

fn engine_with_log(data: GraphData) -> (GraphEngine, Notifications) {
    let log: Notifications = Rc::default();
    let sink = Rc::clone(&log);
    let engine = GraphEngine::init(
        data,
        EngineOptions {
            on_select: Some(Box::new(move |id| sink.borrow_mut().push(id.map(str::to_owned)))),
            ..EngineOptions::default()
        },
    )
    .expect("valid graph");
    (engine, log)
}

fn displayed_ids(engine: &GraphEngine) -> Vec<&str> {
    let mut ids = engine
        .displayed_nodes()
        .iter()
        .map(|node| node.id.as_str())
        .collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}

fn displayed_edge_pairs(engine: &GraphEngine) -> Vec<(&str, &str)> {
    engine
        .displayed_edges()
        .iter()
        .map(|edge| (edge.source.as_str(), edge.target.as_str()))
        .collect()
}

fn run(engine: &mut GraphEngine, frames: usize) {
    for _ in 0..frames {
        engine.tick(1.0 / 60.0);
    }
}

#[test]
fn filter_then_reset_restores_the_full_graph() {
    let (mut engine, _) = engine_with_log(abcd());
    assert_eq!(displayed_ids(&engine), vec!["A", "B", "C", "D"]);

    assert!(engine.filter_neighborhood("B"));
    assert_eq!(displayed_ids(&engine), vec!["A", "B", "C"]);
    assert_eq!(displayed_edge_pairs(&engine), vec![("A", "B"), ("B", "C")]);
    assert_eq!(engine.phase(), SelectionPhase::Filtered);
    assert_eq!(engine.focus(), Some("B"));
    assert_eq!(engine.selected(), Some("B"));

    assert!(engine.reset_view());
    assert_eq!(displayed_ids(&engine), vec!["A", "B", "C", "D"]);
    assert_eq!(displayed_edge_pairs(&engine), vec![("A", "B"), ("B", "C")]);
    assert_eq!(engine.phase(), SelectionPhase::Unselected);
}

#[test]
fn select_then_deselect_clears_all_styling() {
    let (mut engine, log) = engine_with_log(abcd());

    assert_eq!(engine.select_node(Some("A")), SelectOutcome::Changed);
    let a = engine.simulation().and_then(|s| s.index_of("A")).expect("displayed");
    assert!(engine.node_style(a).selected);
    assert!((0..engine.displayed_links().len()).any(|i| engine.edge_style(i).highlighted));

    assert_eq!(engine.select_node(None), SelectOutcome::Changed);
    assert_eq!(engine.phase(), SelectionPhase::Unselected);
    assert!((0..engine.displayed_nodes().len()).all(|i| !engine.node_style(i).selected));
    assert!((0..engine.displayed_links().len()).all(|i| !engine.edge_style(i).highlighted));
    assert_eq!(*log.borrow(), vec![Some("A".to_owned()), None]);
}

#[test]
fn unknown_ids_change_nothing_and_notify_nobody() {
    let (mut engine, log) = engine_with_log(abcd());
    engine.select_node(Some("C"));

    assert_eq!(engine.select_node(Some("does-not-exist")), SelectOutcome::UnknownId);
    assert!(!engine.filter_neighborhood("does-not-exist"));
    assert_eq!(engine.selected(), Some("C"));
    assert!(!engine.is_filtered());
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn selecting_outside_the_neighborhood_is_rejected() {
    let (mut engine, log) = engine_with_log(abcd());
    engine.filter_neighborhood("A");
    let notified = log.borrow().len();

    assert_eq!(engine.select_node(Some("D")), SelectOutcome::NotDisplayed);
    assert_eq!(engine.selected(), Some("A"));
    assert!(engine.is_filtered());
    assert_eq!(log.borrow().len(), notified);

    assert_eq!(engine.select_node(Some("B")), SelectOutcome::Changed);
    assert_eq!(engine.phase(), SelectionPhase::Filtered);
}

#[test]
fn status_line_and_reset_button_follow_the_filter() {
    let (mut engine, _) = engine_with_log(abcd());
    assert_eq!(engine.status_line(), "4 nodes, 2 edges");
    assert!(!engine.reset_visible());

    engine.filter_neighborhood("A");
    assert_eq!(engine.status_line(), "Neighborhood: 2 nodes, 1 edges");
    assert!(engine.reset_visible());

    engine.select_node(None);
    assert!(engine.reset_visible());

    engine.reset_view();
    assert_eq!(engine.status_line(), "4 nodes, 2 edges");
    assert!(!engine.reset_visible());
}

#[test]
fn reset_without_a_filter_is_a_no_op() {
    let (mut engine, log) = engine_with_log(abcd());
    engine.select_node(Some("D"));
    run(&mut engine, 30);
    let position = engine.position_of("D");

    assert!(!engine.reset_view());
    assert_eq!(engine.selected(), Some("D"));
    assert_eq!(engine.position_of("D"), position);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn reset_hands_back_fresh_nodes_with_unchanged_metrics() {
    let original = abcd();
    let (mut engine, _) = engine_with_log(original.clone());
    run(&mut engine, 50);
    let handle = engine.begin_drag("B").expect("displayed");
    engine.drag_to(&handle, eframe::egui::vec2(300.0, 300.0));

    engine.filter_neighborhood("B");
    run(&mut engine, 50);
    engine.filter_neighborhood("C");
    engine.reset_view();

    for node in engine.displayed_nodes() {
        let source = original
            .nodes
            .iter()
            .find(|candidate| candidate.id == node.id)
            .expect("same ids as loaded");
        assert!(node.same_snapshot(source));
        assert!(!node.is_pinned());
        assert_eq!(node.velocity, eframe::egui::Vec2::ZERO);
    }
    assert_eq!(engine.displayed_nodes().len(), original.nodes.len());
}

#[test]
fn duplicate_ids_fail_the_load() {
    let mut data = abcd();
    data.nodes.push(node("B", 0.9));
    let error = GraphEngine::init(data, EngineOptions::default()).err();
    assert_eq!(error, Some(LoadError::DuplicateNodeId("B".to_owned())));
}

#[test]
fn dangling_edges_are_kept_out_of_the_layout() {
    let mut data = abcd();
    data.edges.push(Edge::new("A", "elsewhere::missing", EdgeKind::Calls));
    let (mut engine, _) = engine_with_log(data);

    assert_eq!(engine.displayed_edges().len(), 3);
    assert_eq!(engine.displayed_links().len(), 2);
    assert_eq!(engine.store().overview().dangling_edges, 1);
    run(&mut engine, 200);

    engine.filter_neighborhood("A");
    assert_eq!(displayed_edge_pairs(&engine), vec![("A", "B")]);
}

#[test]
fn layout_settles_on_the_full_graph() {
    let (mut engine, _) = engine_with_log(abcd());
    let mut frames = 0;
    while engine.is_animating() && frames < 5_000 {
        engine.tick(1.0 / 60.0);
        frames += 1;
    }
    assert!(!engine.is_animating());
    for node in engine.displayed_nodes() {
        let position = node.position.expect("laid out");
        assert!(position.x.is_finite() && position.y.is_finite());
    }
}

#[test]
fn file_highlight_is_cleared_by_filter_and_reset() {
    let (mut engine, _) = engine_with_log(abcd());
    engine.highlight_file("a.py");
    assert_eq!(engine.highlighted_file(), Some("a.py"));

    engine.filter_neighborhood("A");
    assert_eq!(engine.highlighted_file(), None);

    engine.highlight_file("b.py");
    engine.reset_view();
    assert_eq!(engine.highlighted_file(), None);
}

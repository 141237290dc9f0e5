//! The owned context object hosts embed: one loaded graph, one layout, one
//! selection. Input arrives through typed methods; the only outward channel
//! is the selection callback (plus an optional per-tick hook).

use eframe::egui::Vec2;
use log::{debug, info};

use crate::config::LayoutConfig;
use crate::graph::{self, Edge, GraphData, GraphDataStore, LoadError, Node};
use crate::highlight::{EdgeStyle, HighlightState, NodeStyle};
use crate::layout::scale::screen_radius;
use crate::layout::{DragHandle, LayoutEngine, Link, Simulation};
use crate::selection::{SelectionCallback, SelectionController, SelectionPhase};
use crate::viewport::Viewport;

pub type TickCallback = Box<dyn FnMut()>;

#[derive(Default)]
pub struct EngineOptions {
    /// Fired synchronously on every selection change, `None` on deselect.
    pub on_select: Option<SelectionCallback>,
    /// Fired after every layout step that moved at least one node.
    pub on_tick: Option<TickCallback>,
    pub layout: LayoutConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Changed,
    Unchanged,
    /// Not a node of the loaded graph.
    UnknownId,
    /// Loaded, but outside the currently displayed neighborhood.
    NotDisplayed,
}

pub struct GraphEngine {
    store: GraphDataStore,
    layout: LayoutEngine,
    selection: SelectionController,
    highlight: HighlightState,
    file_highlight: Option<String>,
    viewport: Viewport,
    on_tick: Option<TickCallback>,
}

impl GraphEngine {
    /// Loads `data` and starts laying out the full graph.
    pub fn init(data: GraphData, options: EngineOptions) -> Result<Self, LoadError> {
        let store = GraphDataStore::from_data(data)?;
        let mut layout = LayoutEngine::new(options.layout, store.max_pagerank());
        layout.start(store.fresh_subgraph());
        info!(
            "graph engine ready: {} nodes, {} edges",
            store.node_count(),
            store.edges().len()
        );

        Ok(Self {
            store,
            layout,
            selection: SelectionController::new(options.on_select),
            highlight: HighlightState::default(),
            file_highlight: None,
            viewport: Viewport::default(),
            on_tick: options.on_tick,
        })
    }

    pub fn store(&self) -> &GraphDataStore {
        &self.store
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    pub fn focus(&self) -> Option<&str> {
        self.selection.focus()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    pub fn is_filtered(&self) -> bool {
        self.selection.is_filtered()
    }

    /// Whether the host should show its "reset view" affordance.
    pub fn reset_visible(&self) -> bool {
        self.selection.is_filtered()
    }

    pub fn highlighted_file(&self) -> Option<&str> {
        self.file_highlight.as_deref()
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.layout.simulation()
    }

    pub fn displayed_nodes(&self) -> &[Node] {
        self.layout.simulation().map_or(&[], Simulation::nodes)
    }

    pub fn displayed_edges(&self) -> &[Edge] {
        self.layout.simulation().map_or(&[], Simulation::edges)
    }

    pub fn displayed_links(&self) -> &[Link] {
        self.layout.simulation().map_or(&[], Simulation::links)
    }

    pub fn is_displayed(&self, id: &str) -> bool {
        self.layout
            .simulation()
            .is_some_and(|simulation| simulation.contains(id))
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn node_style(&self, index: usize) -> NodeStyle {
        self.highlight.node_style(index)
    }

    pub fn edge_style(&self, link_index: usize) -> EdgeStyle {
        self.highlight.edge_style(link_index)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        self.layout.config()
    }

    pub fn set_layout_config(&mut self, config: LayoutConfig) {
        self.layout.set_config(config, self.store.max_pagerank());
    }

    /// Brings the current layout back to full energy without reseeding.
    pub fn reheat_layout(&mut self) {
        self.layout.restart();
    }

    /// Lays the displayed subset out again from scratch with the current
    /// tuning.
    pub fn restart_layout(&mut self) {
        let Some(subgraph) = self.layout.stop() else {
            return;
        };
        self.layout.start(subgraph);
        self.rebuild_highlight();
    }

    pub fn is_animating(&self) -> bool {
        self.layout.is_running()
    }

    pub fn status_line(&self) -> String {
        let nodes = self.displayed_nodes().len();
        let edges = self.displayed_links().len();
        if self.selection.is_filtered() {
            format!("Neighborhood: {nodes} nodes, {edges} edges")
        } else {
            format!("{nodes} nodes, {edges} edges")
        }
    }

    /// Programmatic selection. `None` deselects. Ids outside the displayed
    /// subset are rejected without touching any state. The viewport recenters
    /// on the selected node.
    pub fn select_node(&mut self, id: Option<&str>) -> SelectOutcome {
        self.apply_selection(id, true)
    }

    /// Selection made by pointing at the canvas. Same rules as
    /// [`Self::select_node`], but the viewport stays where it is so the node
    /// remains under the pointer.
    pub fn click_node(&mut self, id: Option<&str>) -> SelectOutcome {
        self.apply_selection(id, false)
    }

    fn apply_selection(&mut self, id: Option<&str>, recenter: bool) -> SelectOutcome {
        if let Some(id) = id {
            if !self.store.contains(id) {
                debug!("select ignored: unknown id {id}");
                return SelectOutcome::UnknownId;
            }
            if !self.is_displayed(id) {
                debug!("select ignored: {id} is outside the displayed neighborhood");
                return SelectOutcome::NotDisplayed;
            }
        }

        self.file_highlight = None;
        let changed = self.selection.select(id);
        if recenter && let Some(position) = id.and_then(|id| self.position_of(id)) {
            self.viewport.center_on(position);
        }
        self.rebuild_highlight();

        if changed {
            SelectOutcome::Changed
        } else {
            SelectOutcome::Unchanged
        }
    }

    /// Dims everything outside `path`. Leaves the selection alone.
    pub fn highlight_file(&mut self, path: &str) {
        debug!("file highlight -> {path}");
        self.file_highlight = Some(path.to_owned());
        self.rebuild_highlight();
    }

    pub fn clear_file_highlight(&mut self) {
        if self.file_highlight.take().is_some() {
            self.rebuild_highlight();
        }
    }

    /// Narrows the display to `id` and its direct neighbors and selects `id`.
    /// Returns false for ids that are not in the loaded graph.
    pub fn filter_neighborhood(&mut self, id: &str) -> bool {
        if !self.store.contains(id) {
            debug!("filter ignored: unknown id {id}");
            return false;
        }

        let subgraph = graph::filter_neighborhood(id, self.store.nodes(), self.store.edges());
        info!(
            "neighborhood of {id}: {} nodes, {} edges",
            subgraph.nodes.len(),
            subgraph.edges.len()
        );
        self.layout.start(subgraph);
        self.file_highlight = None;
        self.selection.enter_filter(id);
        self.viewport.center_on(Vec2::ZERO);
        self.rebuild_highlight();
        true
    }

    /// Restores the full graph and clears the selection. No-op unless
    /// filtered.
    pub fn reset_view(&mut self) -> bool {
        if !self.selection.is_filtered() {
            return false;
        }

        info!("view reset to the full graph");
        self.layout.start(self.store.fresh_subgraph());
        self.file_highlight = None;
        self.selection.leave_filter();
        self.viewport.center_on(Vec2::ZERO);
        self.rebuild_highlight();
        true
    }

    /// One frame of layout. Returns whether any node moved.
    pub fn tick(&mut self, delta_seconds: f32) -> bool {
        let moved = self.layout.tick(delta_seconds);
        if moved && let Some(on_tick) = self.on_tick.as_mut() {
            on_tick();
        }
        moved
    }

    pub fn begin_drag(&mut self, id: &str) -> Option<DragHandle> {
        self.layout.begin_drag(id)
    }

    pub fn drag_to(&mut self, handle: &DragHandle, world: Vec2) -> bool {
        self.layout.drag_to(handle, world)
    }

    pub fn end_drag(&mut self, handle: DragHandle) -> bool {
        self.layout.end_drag(handle)
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        self.layout.simulation()?.position_of(id)
    }

    /// Topmost displayed node whose drawn circle covers `world` at the
    /// current zoom.
    pub fn node_at(&self, world: Vec2) -> Option<&Node> {
        let simulation = self.layout.simulation()?;
        let zoom = self.viewport.zoom;
        simulation
            .nodes()
            .iter()
            .zip(simulation.radii())
            .filter_map(|(node, radius)| {
                let distance = (node.position? - world).length();
                let reach = screen_radius(*radius, zoom) / zoom;
                (distance <= reach).then_some((node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node)
    }

    fn rebuild_highlight(&mut self) {
        self.highlight = HighlightState::build(
            self.layout.simulation(),
            self.selection.selected(),
            self.file_highlight.as_deref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use eframe::egui::vec2;

    use super::*;
    use crate::graph::{EdgeKind, NodeKind};

    fn data() -> GraphData {
        let mut nodes = ["a", "b", "c"]
            .iter()
            .map(|id| Node::new(*id, *id, NodeKind::Function))
            .collect::<Vec<_>>();
        nodes[2].file_path = "lib.py".to_owned();
        GraphData {
            nodes,
            edges: vec![Edge::new("a", "b", EdgeKind::Calls)],
            ..GraphData::default()
        }
    }

    #[test]
    fn tick_callback_fires_only_on_motion() {
        let ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ticks);
        let mut engine = GraphEngine::init(
            data(),
            EngineOptions {
                on_tick: Some(Box::new(move || counter.set(counter.get() + 1))),
                ..EngineOptions::default()
            },
        )
        .expect("valid data");

        assert!(engine.tick(1.0 / 60.0));
        assert_eq!(ticks.get(), 1);

        while engine.is_animating() {
            engine.tick(1.0 / 60.0);
        }
        let settled = ticks.get();
        assert!(!engine.tick(1.0 / 60.0));
        assert_eq!(ticks.get(), settled);
    }

    #[test]
    fn selection_recenters_viewport_on_the_node() {
        let mut engine = GraphEngine::init(data(), EngineOptions::default()).expect("valid data");
        let position = engine.position_of("b").expect("seeded");
        engine.viewport_mut().zoom = 2.0;

        assert_eq!(engine.select_node(Some("b")), SelectOutcome::Changed);
        assert_eq!(engine.viewport().pan, -position * 2.0);
    }

    #[test]
    fn canvas_clicks_leave_the_viewport_alone() {
        let mut engine = GraphEngine::init(data(), EngineOptions::default()).expect("valid data");
        let viewport = *engine.viewport();

        assert_eq!(engine.click_node(Some("b")), SelectOutcome::Changed);
        assert_eq!(engine.selected(), Some("b"));
        assert_eq!(*engine.viewport(), viewport);
        assert_eq!(engine.click_node(Some("missing")), SelectOutcome::UnknownId);
    }

    #[test]
    fn file_highlight_survives_until_the_primary_view_changes() {
        let mut engine = GraphEngine::init(data(), EngineOptions::default()).expect("valid data");
        engine.select_node(Some("a"));
        engine.highlight_file("lib.py");
        assert_eq!(engine.selected(), Some("a"));
        assert!(engine.node_style(0).dimmed && engine.node_style(0).selected);

        engine.select_node(Some("b"));
        assert_eq!(engine.highlighted_file(), None);
        assert!(!engine.node_style(0).dimmed);
    }

    #[test]
    fn node_at_picks_the_node_under_the_point() {
        let engine = GraphEngine::init(data(), EngineOptions::default()).expect("valid data");
        let position = engine.position_of("c").expect("seeded");
        assert_eq!(engine.node_at(position).map(|node| node.id.as_str()), Some("c"));
        assert!(engine.node_at(position + vec2(10_000.0, 0.0)).is_none());
    }

    #[test]
    fn drag_from_before_a_filter_is_ignored() {
        let mut engine = GraphEngine::init(data(), EngineOptions::default()).expect("valid data");
        let handle = engine.begin_drag("a").expect("displayed");
        assert!(engine.filter_neighborhood("a"));
        assert!(!engine.drag_to(&handle, vec2(500.0, 500.0)));
        assert!(!engine.end_drag(handle));
    }
}

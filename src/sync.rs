//! Keeps the graph and the collaborator views on the same selection.
//!
//! Views never talk to each other. They post intents on the coordinator's
//! channel; the coordinator applies them to the engine and re-broadcasts the
//! engine's selection notifications to every view except the one that asked.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use log::debug;

use crate::engine::{GraphEngine, SelectOutcome};
use crate::selection::SelectionCallback;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewId {
    Graph,
    Tree,
    Search,
    Detail,
    Code,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    Select { origin: ViewId, id: Option<String> },
    Focus { origin: ViewId, id: String },
    Reset { origin: ViewId },
    HighlightFile { origin: ViewId, path: Option<String> },
    /// Asks the other views to show a whole file rather than one symbol.
    /// Leaves the selection alone.
    ShowFile { origin: ViewId, path: String },
    /// Posted by the engine's selection callback.
    Selected(Option<String>),
}

impl SyncEvent {
    fn origin(&self) -> Option<ViewId> {
        match self {
            Self::Select { origin, .. }
            | Self::Focus { origin, .. }
            | Self::Reset { origin }
            | Self::HighlightFile { origin, .. } => Some(*origin),
            // Neither starts a selection change.
            Self::ShowFile { .. } | Self::Selected(_) => None,
        }
    }
}

/// A view that follows the shared selection.
pub trait SelectionView {
    fn view_id(&self) -> ViewId;

    fn show_selection(&mut self, id: Option<&str>, engine: &GraphEngine);

    fn show_filter(&mut self, _focus: Option<&str>, _engine: &GraphEngine) {}

    fn show_file(&mut self, _path: &str, _engine: &GraphEngine) {}
}

pub struct ViewSyncCoordinator {
    tx: Sender<SyncEvent>,
    rx: Receiver<SyncEvent>,
    current: Option<String>,
}

impl Default for ViewSyncCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSyncCoordinator {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            current: None,
        }
    }

    pub fn sender(&self) -> Sender<SyncEvent> {
        self.tx.clone()
    }

    /// The engine-side half: hand this to `EngineOptions::on_select`.
    pub fn selection_callback(&self) -> SelectionCallback {
        let tx = self.tx.clone();
        Box::new(move |id| {
            if tx.send(SyncEvent::Selected(id.map(str::to_owned))).is_err() {
                debug!("selection notification dropped, coordinator is gone");
            }
        })
    }

    /// Last selection broadcast to the views.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Drains every queued event. Returns how many were handled.
    pub fn pump(&mut self, engine: &mut GraphEngine, views: &mut [&mut dyn SelectionView]) -> usize {
        let mut origin = None;
        let mut handled = 0;

        loop {
            let event = match self.rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            handled += 1;

            if let Some(from) = event.origin() {
                origin = Some(from);
            }

            match event {
                SyncEvent::Select { origin: from, id } => {
                    if apply_select(engine, from, id.as_deref()) {
                        broadcast_filter(engine, views, origin);
                    }
                }
                SyncEvent::Focus { id, .. } => {
                    if engine.filter_neighborhood(&id) {
                        broadcast_filter(engine, views, origin);
                    }
                }
                SyncEvent::Reset { .. } => {
                    if engine.reset_view() {
                        broadcast_filter(engine, views, origin);
                    }
                }
                SyncEvent::HighlightFile { path, .. } => match path {
                    Some(path) => engine.highlight_file(&path),
                    None => engine.clear_file_highlight(),
                },
                SyncEvent::ShowFile { origin: from, path } => {
                    debug!("showing file {path} (origin {from:?})");
                    for view in views.iter_mut().filter(|view| view.view_id() != from) {
                        view.show_file(&path, engine);
                    }
                }
                SyncEvent::Selected(id) => {
                    if self.current == id {
                        continue;
                    }
                    debug!("broadcasting selection {id:?} (origin {origin:?})");
                    for view in views.iter_mut().filter(|view| Some(view.view_id()) != origin) {
                        view.show_selection(id.as_deref(), engine);
                    }
                    self.current = id;
                }
            }
        }

        handled
    }
}

/// Returns whether the view had to be reset to reach the node. Clicks on the
/// canvas keep the viewport still; every other view recenters on the node.
fn apply_select(engine: &mut GraphEngine, origin: ViewId, id: Option<&str>) -> bool {
    let outcome = if origin == ViewId::Graph {
        engine.click_node(id)
    } else {
        engine.select_node(id)
    };
    match outcome {
        SelectOutcome::NotDisplayed => {
            engine.reset_view();
            engine.select_node(id);
            true
        }
        SelectOutcome::UnknownId => {
            debug!("ignoring selection of unknown id {id:?}");
            false
        }
        SelectOutcome::Changed | SelectOutcome::Unchanged => false,
    }
}

fn broadcast_filter(engine: &GraphEngine, views: &mut [&mut dyn SelectionView], origin: Option<ViewId>) {
    for view in views.iter_mut().filter(|view| Some(view.view_id()) != origin) {
        view.show_filter(engine.focus(), engine);
    }
}

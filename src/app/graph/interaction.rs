use eframe::egui::{self, PointerButton, Rect, Ui};

use symgraph_explorer::sync::{SyncEvent, ViewId};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.engine.viewport_mut().zoom_at(rect, pointer, zoom_factor);
    }

    /// Secondary or middle drag pans; primary drag pins and moves the node
    /// under the pointer, or pans when it started on the background.
    pub(in crate::app) fn handle_graph_drag(&mut self, rect: Rect, response: &egui::Response, hovered: Option<&str>) {
        if response.dragged_by(PointerButton::Secondary) || response.dragged_by(PointerButton::Middle) {
            self.engine.viewport_mut().pan_by(response.drag_delta());
        }

        if response.drag_started_by(PointerButton::Primary) {
            self.drag = hovered.and_then(|id| self.engine.begin_drag(id));
        }

        if response.dragged_by(PointerButton::Primary) {
            match (self.drag, response.interact_pointer_pos()) {
                (Some(handle), Some(pointer)) => {
                    let world = self.engine.viewport().screen_to_world(rect, pointer);
                    if !self.engine.drag_to(&handle, world) {
                        self.drag = None;
                    }
                }
                (None, _) => self.engine.viewport_mut().pan_by(response.drag_delta()),
                (Some(_), None) => {}
            }
        }

        if response.drag_stopped()
            && let Some(handle) = self.drag.take()
        {
            self.engine.end_drag(handle);
        }
    }

    /// Click selects, background click deselects, double click focuses the
    /// neighborhood.
    pub(in crate::app) fn handle_graph_clicks(&mut self, response: &egui::Response, hovered: Option<&str>) {
        if response.double_clicked_by(PointerButton::Primary) {
            if let Some(id) = hovered {
                self.post(SyncEvent::Focus {
                    origin: ViewId::Graph,
                    id: id.to_owned(),
                });
            }
        } else if response.clicked_by(PointerButton::Primary) {
            self.post(SyncEvent::Select {
                origin: ViewId::Graph,
                id: hovered.map(str::to_owned),
            });
        }
    }

    pub(in crate::app) fn handle_graph_keys(&mut self, ui: &Ui) {
        if ui.ctx().wants_keyboard_input() || !ui.input(|input| input.key_pressed(egui::Key::Escape)) {
            return;
        }

        if self.engine.reset_visible() {
            self.post(SyncEvent::Reset { origin: ViewId::Graph });
        } else if self.engine.selected().is_some() {
            self.post(SyncEvent::Select {
                origin: ViewId::Graph,
                id: None,
            });
        } else {
            self.post(SyncEvent::HighlightFile {
                origin: ViewId::Graph,
                path: None,
            });
        }
    }
}

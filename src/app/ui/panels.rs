use eframe::egui::{self, Align, Context, Layout};

use symgraph_explorer::source::GraphSource;
use symgraph_explorer::sync::{SyncEvent, ViewId};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &GraphSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.pump();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("symgraph-explorer");
                    ui.separator();
                    ui.label(format!("source: {source}"));

                    let files = ui.label(format!("files: {}", self.overview.files));
                    if !self.overview.by_language.is_empty() {
                        let languages = self
                            .overview
                            .by_language
                            .iter()
                            .map(|(language, count)| format!("{language}: {count}"))
                            .collect::<Vec<_>>()
                            .join("\n");
                        files.on_hover_text(languages);
                    }
                    if self.overview.dangling_edges > 0 {
                        ui.label(format!("unresolved edges: {}", self.overview.dangling_edges))
                            .on_hover_text("Edges whose endpoints are not in the graph are not drawn");
                    }

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Restart layout").clicked() {
                        self.engine.restart_layout();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.engine.reset_visible() && ui.button("Reset view").clicked() {
                            self.post(SyncEvent::Reset { origin: ViewId::Graph });
                        }
                        if let Some(path) = self.engine.highlighted_file() {
                            let count = self.engine.store().symbols_in_file(path).len();
                            let label = format!("Clear highlight: {path} ({count} symbols)");
                            if ui.button(label).clicked() {
                                self.post(SyncEvent::HighlightFile {
                                    origin: ViewId::Graph,
                                    path: None,
                                });
                            }
                        }
                        ui.label(self.engine.status_line());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("details_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.detail.ui(ui, &self.engine, &self.intents);
                        ui.separator();
                        self.code.ui(ui);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading symbol graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });

        if self.pump() > 0 {
            ctx.request_repaint();
        }
    }
}

use std::sync::mpsc::Sender;

use eframe::egui::{self, RichText, Ui};

use symgraph_explorer::sync::{SelectionView, SyncEvent, ViewId};
use symgraph_explorer::util::{file_name, format_score, line_span};
use symgraph_explorer::{GraphEngine, Node};

use crate::app::send_intent;

const RELATED_ROW_HEIGHT: f32 = 20.0;

#[derive(Default)]
pub(in crate::app) struct DetailPanel {
    selected: Option<String>,
    /// When set, the panel shows this file instead of the selected symbol.
    file: Option<String>,
}

impl DetailPanel {
    pub(in crate::app) fn ui(&mut self, ui: &mut Ui, engine: &GraphEngine, intents: &Sender<SyncEvent>) {
        let mut events = Vec::new();

        if let Some(path) = self.file.clone() {
            self.file_ui(ui, engine, &path, &mut events);
        } else {
            self.symbol_ui(ui, engine, &mut events);
        }

        for event in events {
            // The coordinator does not echo a request back to its origin.
            match &event {
                SyncEvent::Select { id: Some(id), .. } => {
                    self.selected = Some(id.clone());
                    self.file = None;
                }
                SyncEvent::ShowFile { path, .. } => self.file = Some(path.clone()),
                _ => {}
            }
            send_intent(intents, event);
        }
    }

    fn symbol_ui(&self, ui: &mut Ui, engine: &GraphEngine, events: &mut Vec<SyncEvent>) {
        ui.heading("Symbol Details");
        ui.add_space(6.0);

        let Some(node) = self.selected.as_deref().and_then(|id| engine.store().get(id)) else {
            ui.label("Select a symbol in the graph, the file tree or the search results.");
            return;
        };

        ui.label(RichText::new(node.name.as_str()).strong());
        ui.small(node.qualified_name.as_str());
        if let Some(signature) = &node.signature {
            ui.label(RichText::new(signature.as_str()).monospace());
        }
        if let Some(summary) = &node.summary {
            ui.add_space(4.0);
            ui.label(summary.as_str());
        }
        ui.add_space(6.0);

        ui.label(format!("Kind: {}", node.kind.label()));
        ui.horizontal(|ui| {
            ui.label("File:");
            let location = match line_span(node.line, node.end_line) {
                Some(span) => format!("{}:{span}", node.file_path),
                None => node.file_path.clone(),
            };
            if ui.link(location).on_hover_text("Show file details").clicked() {
                events.push(SyncEvent::ShowFile {
                    origin: ViewId::Detail,
                    path: node.file_path.clone(),
                });
            }
        });
        ui.label(format!("PageRank: {}", format_score(node.pagerank)));
        ui.label(format!("Betweenness: {}", format_score(node.betweenness)));
        ui.label(format!("Callers: {}   Callees: {}", node.in_degree, node.out_degree));

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let focused = engine.focus() == Some(node.id.as_str());
            if ui
                .add_enabled(!focused, egui::Button::new("Focus neighborhood"))
                .clicked()
            {
                events.push(SyncEvent::Focus {
                    origin: ViewId::Detail,
                    id: node.id.clone(),
                });
            }
            highlight_toggle(ui, engine, &node.file_path, events);
        });

        ui.separator();
        related_list(ui, "Callers", "callers_scroll", &engine.store().callers(&node.id), events);
        ui.separator();
        related_list(ui, "Callees", "callees_scroll", &engine.store().callees(&node.id), events);
    }

    fn file_ui(&mut self, ui: &mut Ui, engine: &GraphEngine, path: &str, events: &mut Vec<SyncEvent>) {
        ui.heading("File Details");
        ui.add_space(6.0);

        if let Some(node) = self.selected.as_deref().and_then(|id| engine.store().get(id))
            && ui.button(format!("Back to {}", node.name)).clicked()
        {
            self.file = None;
        }

        ui.label(RichText::new(file_name(path)).strong());
        ui.small(path);
        ui.add_space(6.0);

        let record = engine.store().file(path);
        if let Some(language) = record.and_then(|record| record.language.as_deref()) {
            ui.label(format!("Language: {language}"));
        }
        if let Some(lines) = record.and_then(|record| record.line_count) {
            ui.label(format!("Lines: {lines}"));
        }
        if let Some(summary) = record.and_then(|record| record.summary.as_deref()) {
            ui.add_space(4.0);
            ui.label(summary);
        }

        ui.add_space(6.0);
        highlight_toggle(ui, engine, path, events);

        ui.separator();
        let symbols = engine.store().symbols_in_file(path);
        ui.label(RichText::new(format!("Symbols ({})", symbols.len())).strong());
        if symbols.is_empty() {
            ui.weak("None");
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("file_symbols_scroll")
            .max_height(360.0)
            .auto_shrink([false, true])
            .show_rows(ui, RELATED_ROW_HEIGHT, symbols.len(), |ui, row_range| {
                for node in &symbols[row_range] {
                    let label = match line_span(node.line, node.end_line) {
                        Some(span) => format!("{}  ({}, {span})", node.name, node.kind.label()),
                        None => format!("{}  ({})", node.name, node.kind.label()),
                    };
                    let mut response = ui.link(label);
                    if let Some(signature) = &node.signature {
                        response = response.on_hover_text(signature.as_str());
                    }
                    if response.clicked() {
                        events.push(SyncEvent::Select {
                            origin: ViewId::Detail,
                            id: Some(node.id.clone()),
                        });
                    }
                }
            });
    }
}

fn highlight_toggle(ui: &mut Ui, engine: &GraphEngine, path: &str, events: &mut Vec<SyncEvent>) {
    let highlighted = engine.highlighted_file() == Some(path);
    let label = format!("Highlight {}", file_name(path));
    if ui.selectable_label(highlighted, label).clicked() {
        events.push(SyncEvent::HighlightFile {
            origin: ViewId::Detail,
            path: (!highlighted).then(|| path.to_owned()),
        });
    }
}

fn related_list(ui: &mut Ui, title: &str, id_salt: &str, nodes: &[&Node], events: &mut Vec<SyncEvent>) {
    ui.label(RichText::new(format!("{title} ({})", nodes.len())).strong());
    if nodes.is_empty() {
        ui.weak("None");
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt(id_salt)
        .max_height(200.0)
        .auto_shrink([false, true])
        .show_rows(ui, RELATED_ROW_HEIGHT, nodes.len(), |ui, row_range| {
            for node in &nodes[row_range] {
                let response = ui
                    .link(format!("{}  ({})", node.name, node.kind.label()))
                    .on_hover_text(format!("{}\n{}", node.qualified_name, node.file_path));
                if response.clicked() {
                    events.push(SyncEvent::Select {
                        origin: ViewId::Detail,
                        id: Some(node.id.clone()),
                    });
                }
            }
        });
}

impl SelectionView for DetailPanel {
    fn view_id(&self) -> ViewId {
        ViewId::Detail
    }

    fn show_selection(&mut self, id: Option<&str>, _engine: &GraphEngine) {
        self.selected = id.map(str::to_owned);
        self.file = None;
    }

    fn show_file(&mut self, path: &str, _engine: &GraphEngine) {
        self.file = Some(path.to_owned());
    }
}

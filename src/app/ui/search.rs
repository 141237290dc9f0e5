use std::sync::mpsc::Sender;

use eframe::egui::{self, RichText, Ui};

use symgraph_explorer::search::{DEFAULT_LIMIT, search};
use symgraph_explorer::sync::{SyncEvent, ViewId};
use symgraph_explorer::{GraphEngine, NodeKind};

use crate::app::send_intent;

struct SearchRow {
    id: String,
    name: String,
    qualified_name: String,
    kind: NodeKind,
    file_path: String,
}

#[derive(Default)]
pub(in crate::app) struct SearchPanel {
    query: String,
    cached_query: String,
    rows: Vec<SearchRow>,
}

impl SearchPanel {
    fn refresh(&mut self, engine: &GraphEngine) {
        if self.cached_query == self.query {
            return;
        }

        self.rows = search(engine.store().nodes(), &self.query, DEFAULT_LIMIT)
            .into_iter()
            .map(|hit| SearchRow {
                id: hit.node.id.clone(),
                name: hit.node.name.clone(),
                qualified_name: hit.node.qualified_name.clone(),
                kind: hit.node.kind,
                file_path: hit.node.file_path.clone(),
            })
            .collect();
        self.cached_query.clone_from(&self.query);
    }

    pub(in crate::app) fn ui(&mut self, ui: &mut Ui, engine: &GraphEngine, intents: &Sender<SyncEvent>) {
        ui.label(RichText::new("Search").strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("symbol name")
                .desired_width(f32::INFINITY),
        );
        self.refresh(engine);

        if self.query.trim().is_empty() {
            return;
        }
        if self.rows.is_empty() {
            ui.weak("No matching symbols.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("search_results")
            .max_height(240.0)
            .show(ui, |ui| {
                for row in &self.rows {
                    let selected = engine.selected() == Some(row.id.as_str());
                    let label = format!("{}  ({})", row.name, row.kind.label());
                    let response = ui
                        .selectable_label(selected, label)
                        .on_hover_text(format!("{}\n{}", row.qualified_name, row.file_path));
                    if response.clicked() {
                        send_intent(
                            intents,
                            SyncEvent::Select {
                                origin: ViewId::Search,
                                id: Some(row.id.clone()),
                            },
                        );
                    }
                }
            });
    }
}

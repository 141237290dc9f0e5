use std::collections::HashSet;
use std::sync::mpsc::Sender;

use eframe::egui::{self, RichText, Ui};

use symgraph_explorer::GraphEngine;
use symgraph_explorer::graph::GraphDataStore;
use symgraph_explorer::sync::{SelectionView, SyncEvent, ViewId};
use symgraph_explorer::tree::{DirEntry, FileEntry, ancestor_dirs, build_tree};

use crate::app::send_intent;

pub(in crate::app) struct TreePanel {
    root: DirEntry,
    selected: Option<String>,
    /// Directory and file paths to force open on the next frame.
    reveal: HashSet<String>,
    /// Symbols of the focused neighborhood; everything else is drawn dimmed.
    in_view: Option<HashSet<String>>,
}

impl TreePanel {
    pub(in crate::app) fn new(store: &GraphDataStore) -> Self {
        Self {
            root: build_tree(store),
            selected: None,
            reveal: HashSet::new(),
            in_view: None,
        }
    }

    pub(in crate::app) fn ui(&mut self, ui: &mut Ui, intents: &Sender<SyncEvent>) {
        let mut events = Vec::new();
        for dir in &self.root.dirs {
            self.dir_ui(ui, dir, &mut events);
        }
        for file in &self.root.files {
            self.file_ui(ui, file, &mut events);
        }
        self.reveal.clear();

        for event in events {
            if let SyncEvent::Select { id: Some(id), .. } = &event {
                self.selected = Some(id.clone());
            }
            send_intent(intents, event);
        }
    }

    fn in_view(&self, id: &str) -> bool {
        self.in_view.as_ref().is_none_or(|ids| ids.contains(id))
    }

    fn dir_ui(&self, ui: &mut Ui, dir: &DirEntry, events: &mut Vec<SyncEvent>) {
        let open = self.reveal.contains(&dir.path).then_some(true);
        let response = egui::CollapsingHeader::new(format!("{}/  ({})", dir.name, dir.symbol_count))
            .id_salt(("tree-dir", dir.path.as_str()))
            .open(open)
            .show(ui, |ui| {
                for child in &dir.dirs {
                    self.dir_ui(ui, child, events);
                }
                for file in &dir.files {
                    self.file_ui(ui, file, events);
                }
            });
        if let Some(summary) = &dir.summary {
            response.header_response.on_hover_text(summary.as_str());
        }
    }

    fn file_ui(&self, ui: &mut Ui, file: &FileEntry, events: &mut Vec<SyncEvent>) {
        let open = self.reveal.contains(&file.path).then_some(true);
        let header = egui::CollapsingHeader::new(format!("{}  ({})", file.name, file.symbols.len()))
            .id_salt(("tree-file", file.path.as_str()))
            .open(open)
            .show(ui, |ui| {
                if ui.small_button("File details").clicked() {
                    events.push(SyncEvent::ShowFile {
                        origin: ViewId::Tree,
                        path: file.path.clone(),
                    });
                }
                for symbol in &file.symbols {
                    let selected = self.selected.as_deref() == Some(symbol.id.as_str());
                    let label = match symbol.line {
                        Some(line) => format!("{} {}  :{line}", symbol.kind.label(), symbol.name),
                        None => format!("{} {}", symbol.kind.label(), symbol.name),
                    };
                    let label = if self.in_view(&symbol.id) {
                        RichText::new(label)
                    } else {
                        RichText::new(label).weak()
                    };
                    let mut response = ui.selectable_label(selected, label);
                    if let Some(summary) = &symbol.summary {
                        response = response.on_hover_text(summary.as_str());
                    }
                    if selected && !self.reveal.is_empty() {
                        response.scroll_to_me(Some(egui::Align::Center));
                    }
                    if response.clicked() {
                        events.push(SyncEvent::Select {
                            origin: ViewId::Tree,
                            id: Some(symbol.id.clone()),
                        });
                    }
                }
            });

        let header_response = match &file.summary {
            Some(summary) => header.header_response.on_hover_text(summary.as_str()),
            None => header.header_response,
        };
        header_response.context_menu(|ui| {
            if ui.button("Show file details").clicked() {
                events.push(SyncEvent::ShowFile {
                    origin: ViewId::Tree,
                    path: file.path.clone(),
                });
            }
            if ui.button("Highlight file in graph").clicked() {
                events.push(SyncEvent::HighlightFile {
                    origin: ViewId::Tree,
                    path: Some(file.path.clone()),
                });
            }
        });
    }
}

impl SelectionView for TreePanel {
    fn view_id(&self) -> ViewId {
        ViewId::Tree
    }

    fn show_selection(&mut self, id: Option<&str>, engine: &GraphEngine) {
        self.selected = id.map(str::to_owned);
        if let Some(node) = id.and_then(|id| engine.store().get(id)) {
            self.reveal.extend(ancestor_dirs(&node.file_path));
            self.reveal.insert(node.file_path.clone());
        }
    }

    fn show_filter(&mut self, focus: Option<&str>, engine: &GraphEngine) {
        if focus.is_none() {
            self.in_view = None;
            return;
        }
        let displayed = engine
            .displayed_nodes()
            .iter()
            .map(|node| node.id.clone())
            .collect::<HashSet<_>>();
        self.reveal
            .extend(self.root.paths_containing(|id| displayed.contains(id)));
        self.in_view = Some(displayed);
    }

    fn show_file(&mut self, path: &str, _engine: &GraphEngine) {
        self.reveal.extend(ancestor_dirs(path));
        self.reveal.insert(path.to_owned());
    }
}

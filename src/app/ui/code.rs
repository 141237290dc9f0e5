use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};
use log::warn;

use symgraph_explorer::GraphEngine;
use symgraph_explorer::source::{Excerpt, read_excerpt};
use symgraph_explorer::sync::{SelectionView, ViewId};

const CONTEXT_LINES: u32 = 3;

pub(in crate::app) struct CodePanel {
    root: Option<PathBuf>,
    title: Option<String>,
    excerpt: Option<Result<Excerpt, String>>,
}

impl CodePanel {
    pub(in crate::app) fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            title: None,
            excerpt: None,
        }
    }

    pub(in crate::app) fn ui(&mut self, ui: &mut Ui) {
        egui::CollapsingHeader::new(RichText::new("Source").strong())
            .id_salt("code_panel")
            .default_open(true)
            .show(ui, |ui| {
                if self.root.is_none() {
                    ui.weak("Start with --source-root to show source excerpts.");
                    return;
                }

                match (&self.title, &self.excerpt) {
                    (Some(title), Some(Ok(excerpt))) => {
                        ui.small(title.as_str());
                        egui::ScrollArea::both()
                            .id_salt("code_scroll")
                            .max_height(360.0)
                            .show(ui, |ui| {
                                for (number, line, in_symbol) in excerpt.numbered() {
                                    let text = RichText::new(format!("{number:>5}  {line}")).monospace();
                                    let text = if in_symbol {
                                        text.color(Color32::from_gray(235))
                                    } else {
                                        text.color(Color32::from_gray(140))
                                    };
                                    ui.label(text);
                                }
                            });
                    }
                    (_, Some(Err(error))) => {
                        ui.colored_label(Color32::from_rgb(230, 120, 110), error.as_str());
                    }
                    _ => {
                        ui.weak("No symbol selected.");
                    }
                }
            });
    }
}

impl SelectionView for CodePanel {
    fn view_id(&self) -> ViewId {
        ViewId::Code
    }

    fn show_selection(&mut self, id: Option<&str>, engine: &GraphEngine) {
        self.title = None;
        self.excerpt = None;

        let (Some(root), Some(node)) = (self.root.as_ref(), id.and_then(|id| engine.store().get(id))) else {
            return;
        };
        let Some(start) = node.line else {
            self.excerpt = Some(Err(format!("{} has no line information", node.qualified_name)));
            return;
        };

        self.title = Some(format!("{}:{start}", node.file_path));
        self.excerpt = Some(
            read_excerpt(root, &node.file_path, start, node.end_line, CONTEXT_LINES).map_err(|error| {
                warn!("cannot show source of {}: {error}", node.id);
                format!("{:#}", anyhow::Error::new(error))
            }),
        );
    }
}

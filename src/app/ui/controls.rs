use eframe::egui::{self, RichText, Ui};

use symgraph_explorer::config::LayoutConfig;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        self.search.ui(ui, &self.engine, &self.intents);
        ui.separator();

        egui::CollapsingHeader::new(RichText::new("Layout").strong())
            .id_salt("layout_controls")
            .default_open(false)
            .show(ui, |ui| self.draw_layout_controls(ui));
        ui.separator();

        ui.label(RichText::new("Files").strong());
        egui::ScrollArea::vertical()
            .id_salt("tree_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| self.tree.ui(ui, &self.intents));
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        if let Some(simulation) = self.engine.simulation() {
            let state = if simulation.is_running() {
                format!("Running, energy {:.3}", simulation.alpha())
            } else {
                format!("Settled after {} steps", simulation.steps())
            };
            ui.weak(state);
        }

        let draft = &mut self.layout_draft;
        let mut changed = false;

        changed |= ui
            .add(egui::Slider::new(&mut draft.repulsion, 0.0..=120_000.0).text("Repulsion"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut draft.link_distance, 10.0..=300.0).text("Link distance"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut draft.link_strength, 0.0..=1.0).text("Link strength"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut draft.collision_strength, 0.0..=4.0).text("Collision"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut draft.center_pull, 0.0..=0.05)
                    .logarithmic(true)
                    .text("Center pull"),
            )
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut draft.velocity_damping, 0.5..=0.99).text("Velocity damping"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut draft.alpha_decay, 0.001..=0.2).logarithmic(true).text("Cooling"))
            .changed();

        let mut reheat = false;
        ui.horizontal(|ui| {
            if ui.button("Defaults").clicked() {
                *draft = LayoutConfig::default();
                changed = true;
            }
            reheat = ui.button("Reheat").clicked();
        });

        if changed {
            self.engine.set_layout_config(self.layout_draft);
        }
        if reheat {
            self.engine.reheat_layout();
        }
    }
}

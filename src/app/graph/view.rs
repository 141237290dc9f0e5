use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use symgraph_explorer::layout::scale::{edge_width, label_visible, screen_radius};
use symgraph_explorer::util::format_score;

use super::super::ViewModel;
use super::super::render_utils::{
    HOVER_COLOR, RELATED_COLOR, SELECTED_COLOR, blend_color, circle_visible, dim_color,
    draw_background, edge_visible, kind_color,
};

impl ViewModel {
    /// Node indices sorted by PageRank so prominent nodes are painted last.
    fn draw_order(&mut self) -> &[usize] {
        let Some(simulation) = self.engine.simulation() else {
            return &[];
        };

        let generation = simulation.generation();
        if self
            .draw_order
            .as_ref()
            .is_none_or(|(cached, _)| *cached != generation)
        {
            let nodes = simulation.nodes();
            let mut order = (0..nodes.len()).collect::<Vec<_>>();
            order.sort_by(|a, b| nodes[*a].pagerank.total_cmp(&nodes[*b].pagerank));
            self.draw_order = Some((generation, order));
        }

        self.draw_order.as_ref().map_or(&[], |(_, order)| order.as_slice())
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let moving = self.engine.tick(frame_delta_seconds);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_keys(ui);

        let viewport = *self.engine.viewport();
        let hovered = ui.input(|input| input.pointer.hover_pos()).and_then(|pointer| {
            if !rect.contains(pointer) {
                return None;
            }
            let world = viewport.screen_to_world(rect, pointer);
            self.engine.node_at(world).map(|node| node.id.clone())
        });

        self.handle_graph_drag(rect, &response, hovered.as_deref());
        self.handle_graph_clicks(&response, hovered.as_deref());

        if moving || self.drag.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let viewport = *self.engine.viewport();
        draw_background(&painter, rect, &viewport);

        let order = self.draw_order().to_vec();
        let Some(simulation) = self.engine.simulation() else {
            ui.label("No symbols to display.");
            return;
        };
        if simulation.nodes().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The graph document contains no symbols.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        }

        let zoom = viewport.zoom;
        let screen_positions = simulation
            .nodes()
            .iter()
            .map(|node| viewport.world_to_screen(rect, node.position.unwrap_or_default()))
            .collect::<Vec<Pos2>>();
        let screen_radii = simulation
            .radii()
            .iter()
            .map(|radius| screen_radius(*radius, zoom))
            .collect::<Vec<_>>();
        let highlight = self.engine.highlight();
        let selection_active = highlight.selected_index().is_some();

        for (link_index, link) in simulation.links().iter().enumerate() {
            let start = screen_positions[link.source];
            let end = screen_positions[link.target];
            if !edge_visible(rect, start, end, 2.5) {
                continue;
            }

            let style = self.engine.edge_style(link_index);
            let mut color = if style.highlighted {
                RELATED_COLOR
            } else {
                Color32::from_rgba_unmultiplied(86, 92, 100, 170)
            };
            if style.dimmed || (selection_active && !style.highlighted) {
                color = dim_color(color, 0.45);
            }
            painter.line_segment([start, end], Stroke::new(edge_width(zoom, style.highlighted), color));

            if style.highlighted {
                draw_arrow_head(&painter, start, end, screen_radii[link.target], color);
            }
        }

        let hovered_index = hovered.as_deref().and_then(|id| simulation.index_of(id));
        let mut selection_animating = false;

        for index in order {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let node = &simulation.nodes()[index];
            let style = self.engine.node_style(index);
            let is_hovered = hovered_index == Some(index);

            let base = kind_color(node.kind);
            let mut color = if is_hovered {
                HOVER_COLOR
            } else if style.related {
                blend_color(base, RELATED_COLOR, 0.55)
            } else if selection_active && !style.selected {
                dim_color(base, 0.6)
            } else {
                base
            };
            if style.dimmed {
                color = dim_color(color, 0.3);
            }

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-selection", node.id.as_str())),
                style.selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }
            let color = blend_color(color, SELECTED_COLOR, selection_mix);

            painter.circle_filled(position, radius, color);
            if selection_mix > 0.0 {
                let halo_strength = (selection_mix * (1.0 - selection_mix) * 4.0).clamp(0.0, 1.0);
                let halo_alpha = (30.0 + (halo_strength * 145.0)) as u8;
                painter.circle_stroke(
                    position,
                    radius + 4.0 + ((1.0 - selection_mix) * 6.0),
                    Stroke::new(
                        1.0 + (halo_strength * 1.6),
                        Color32::from_rgba_unmultiplied(245, 206, 93, halo_alpha),
                    ),
                );
            }

            let outline = if node.is_pinned() {
                Stroke::new(2.0, Color32::from_gray(235))
            } else {
                Stroke::new(1.0 + selection_mix * 1.2, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(position, radius, outline);

            let emphasized = style.selected || style.related || is_hovered;
            if label_visible(radius, zoom, emphasized) && !style.dimmed {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.name.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(index) = hovered_index {
            let node = &simulation.nodes()[index];
            let panel_text = format!(
                "{}  |  {}  |  pagerank {}  |  in {} out {}",
                node.qualified_name,
                node.kind.label(),
                format_score(node.pagerank),
                node.in_degree,
                node.out_degree
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}

fn draw_arrow_head(painter: &egui::Painter, start: Pos2, end: Pos2, target_radius: f32, color: Color32) {
    let delta = end - start;
    let length = delta.length();
    if length <= target_radius + 6.0 {
        return;
    }

    let direction = delta / length;
    let tip = end - direction * target_radius;
    let normal = vec2(-direction.y, direction.x);
    let base = tip - direction * 8.0;
    painter.add(egui::Shape::convex_polygon(
        vec![tip, base + normal * 4.0, base - normal * 4.0],
        color,
        Stroke::NONE,
    ));
}

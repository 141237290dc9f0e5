use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 6.0;

/// Pan and zoom of the graph canvas. World coordinates are centered on the
/// origin; the screen rect's center shows `-pan / zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    /// Puts `world` at the center of the canvas without changing zoom.
    pub fn center_on(&mut self, world: Vec2) {
        self.pan = -world * self.zoom;
    }

    /// Zooms by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let world_before = self.screen_to_world(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = anchor - rect.center() - world_before * self.zoom;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    #[test]
    fn screen_and_world_are_inverse() {
        let viewport = Viewport {
            pan: vec2(30.0, -12.0),
            zoom: 1.7,
        };
        let world = vec2(-44.0, 91.5);
        let back = viewport.screen_to_world(canvas(), viewport.world_to_screen(canvas(), world));
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn center_on_brings_point_to_canvas_center() {
        let mut viewport = Viewport {
            pan: Vec2::ZERO,
            zoom: 2.0,
        };
        viewport.center_on(vec2(100.0, -50.0));
        let screen = viewport.world_to_screen(canvas(), vec2(100.0, -50.0));
        assert!((screen - canvas().center()).length() < 1e-3);
    }

    #[test]
    fn zoom_keeps_anchor_fixed_and_clamps() {
        let mut viewport = Viewport::default();
        let anchor = pos2(600.0, 120.0);
        let world = viewport.screen_to_world(canvas(), anchor);

        viewport.zoom_at(canvas(), anchor, 1.15);
        let screen = viewport.world_to_screen(canvas(), world);
        assert!((screen - anchor).length() < 1e-3);

        for _ in 0..200 {
            viewport.zoom_at(canvas(), anchor, 1.15);
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);
    }
}

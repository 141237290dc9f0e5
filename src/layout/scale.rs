//! Node sizing and zoom-dependent visibility.

use crate::config::LayoutConfig;

/// Square-root scale from PageRank to circle radius, floored at
/// `min_radius` so zero-rank nodes stay visible and clickable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    max_pagerank: f64,
    min_radius: f32,
    max_radius: f32,
}

impl RadiusScale {
    pub fn new(max_pagerank: f64, config: &LayoutConfig) -> Self {
        Self {
            max_pagerank: if max_pagerank.is_finite() { max_pagerank.max(0.0) } else { 0.0 },
            min_radius: config.min_radius,
            max_radius: config.max_radius.max(config.min_radius),
        }
    }

    pub fn radius(&self, pagerank: f64) -> f32 {
        if self.max_pagerank <= f64::EPSILON || !pagerank.is_finite() {
            return self.min_radius;
        }

        let t = (pagerank.max(0.0) / self.max_pagerank).sqrt().clamp(0.0, 1.0) as f32;
        self.min_radius + t * (self.max_radius - self.min_radius)
    }
}

pub fn screen_radius(base_radius: f32, zoom: f32) -> f32 {
    (base_radius * zoom.powf(0.40)).clamp(2.5, 46.0)
}

pub fn label_visible(screen_radius: f32, zoom: f32, emphasized: bool) -> bool {
    emphasized || screen_radius > 14.0 || zoom > 1.35
}

pub fn edge_width(zoom: f32, highlighted: bool) -> f32 {
    let zoom_sqrt = zoom.max(0.0).sqrt();
    if highlighted {
        (2.4 * zoom_sqrt).clamp(1.2, 4.4)
    } else {
        (1.0 * zoom_sqrt).clamp(0.5, 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(max: f64) -> RadiusScale {
        RadiusScale::new(max, &LayoutConfig::default())
    }

    #[test]
    fn zero_rank_gets_the_floor_radius() {
        let config = LayoutConfig::default();
        assert_eq!(scale(0.5).radius(0.0), config.min_radius);
        assert_eq!(scale(0.0).radius(0.3), config.min_radius);
    }

    #[test]
    fn radius_is_monotonic_and_sub_linear() {
        let scale = scale(1.0);
        let quarter = scale.radius(0.25);
        let full = scale.radius(1.0);
        let floor = scale.radius(0.0);

        assert!(floor < quarter && quarter < full);
        assert_eq!(full, LayoutConfig::default().max_radius);
        // sqrt(0.25) = 0.5: a quarter of the rank gets half of the range.
        assert!((quarter - (floor + (full - floor) * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn labels_follow_zoom_and_emphasis() {
        assert!(label_visible(3.0, 0.5, true));
        assert!(!label_visible(3.0, 0.5, false));
        assert!(label_visible(3.0, 2.0, false));
        assert!(screen_radius(200.0, 1.0) <= 46.0);
        assert!(edge_width(1.0, true) > edge_width(1.0, false));
    }
}

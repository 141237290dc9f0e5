use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read layout config {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid layout config {path}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Tuning for the force simulation and node sizing.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub repulsion: f32,
    pub repulsion_softening: f32,
    pub barnes_hut_theta: f32,
    pub link_distance: f32,
    pub link_strength: f32,
    pub link_damping: f32,
    pub collision_strength: f32,
    pub collision_padding: f32,
    pub center_pull: f32,
    pub velocity_damping: f32,
    pub max_force: f32,
    pub max_speed: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub drag_alpha_target: f32,
    pub seed_spread: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 30_000.0,
            repulsion_softening: 620.0,
            barnes_hut_theta: 0.72,
            link_distance: 70.0,
            link_strength: 0.12,
            link_damping: 0.22,
            collision_strength: 1.2,
            collision_padding: 3.0,
            center_pull: 0.004,
            velocity_damping: 0.86,
            max_force: 220.0,
            max_speed: 24.0,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
            drag_alpha_target: 0.3,
            seed_spread: 28.0,
            min_radius: 4.0,
            max_radius: 22.0,
        }
    }
}

impl LayoutConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_ron(raw: &str) -> Result<Self, ron::error::SpannedError> {
        let config: Self = ron::from_str(raw)?;
        Ok(config.sanitized())
    }

    /// Clamps values into ranges the simulation stays stable in.
    pub fn sanitized(self) -> Self {
        let min_radius = self.min_radius.clamp(1.0, 40.0);
        Self {
            repulsion: self.repulsion.clamp(0.0, 500_000.0),
            repulsion_softening: self.repulsion_softening.max(1.0),
            barnes_hut_theta: self.barnes_hut_theta.clamp(0.0, 2.0),
            link_distance: self.link_distance.max(0.0),
            link_strength: self.link_strength.clamp(0.0, 1.0),
            link_damping: self.link_damping.clamp(0.0, 1.0),
            collision_strength: self.collision_strength.clamp(0.0, 4.0),
            collision_padding: self.collision_padding.max(0.0),
            center_pull: self.center_pull.clamp(0.0, 0.5),
            velocity_damping: self.velocity_damping.clamp(0.5, 0.99),
            max_force: self.max_force.max(1.0),
            max_speed: self.max_speed.max(0.5),
            alpha_decay: self.alpha_decay.clamp(0.0001, 1.0),
            alpha_min: self.alpha_min.clamp(0.0, 0.5),
            drag_alpha_target: self.drag_alpha_target.clamp(0.0, 1.0),
            seed_spread: self.seed_spread.max(1.0),
            min_radius,
            max_radius: self.max_radius.max(min_radius),
        }
    }
}

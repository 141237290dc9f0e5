//! Force-directed layout over one node/edge subset at a time.
//!
//! A [`LayoutEngine`] owns at most one [`Simulation`]. Starting a layout for
//! a new subset stops and drops the previous one first, and every simulation
//! carries a generation number so that drag handles taken on an older subset
//! are ignored instead of writing into the new one.

mod forces;
mod quadtree;
pub mod scale;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use log::debug;

use crate::config::LayoutConfig;
use crate::graph::{Edge, Node, Subgraph};
use crate::util::stable_pair;

use forces::{CollisionParams, RepulsionParams, accumulate_collisions, accumulate_repulsion};
use quadtree::QuadTree;
use scale::RadiusScale;

/// An edge with both endpoints resolved to node indices of the running
/// simulation. `edge` indexes the bare-id edge it was resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub edge: usize,
}

/// Token for an in-flight drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragHandle {
    generation: u64,
    index: usize,
}

#[derive(Default)]
struct Scratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
}

pub struct Simulation {
    generation: u64,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    links: Vec<Link>,
    index_by_id: HashMap<String, usize>,
    radii: Vec<f32>,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    steps: u64,
    scratch: Scratch,
}

impl Simulation {
    fn new(subgraph: Subgraph, config: &LayoutConfig, scale: &RadiusScale, generation: u64) -> Self {
        let Subgraph { mut nodes, edges } = subgraph;

        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let links = edges
            .iter()
            .enumerate()
            .filter_map(|(edge, raw)| {
                let source = *index_by_id.get(&raw.source)?;
                let target = *index_by_id.get(&raw.target)?;
                Some(Link {
                    source,
                    target,
                    edge,
                })
            })
            .collect::<Vec<_>>();

        let skipped = edges.len() - links.len();
        if skipped > 0 {
            debug!("layout generation {generation}: {skipped} dangling edges left out");
        }

        seed_positions(&mut nodes, config.seed_spread);
        let radii = nodes.iter().map(|node| scale.radius(node.pagerank)).collect();

        Self {
            generation,
            nodes,
            edges,
            links,
            index_by_id,
            radii,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            steps: 0,
            scratch: Scratch::default(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The subset's edges in bare-id form, exactly as handed in.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges whose endpoints both exist in this subset.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        self.index_of(id).and_then(|index| self.nodes[index].position)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Back to bare ids and fresh nodes, e.g. to hand the subset to another
    /// simulation.
    pub fn to_subgraph(&self) -> Subgraph {
        Subgraph {
            nodes: self.nodes.iter().map(Node::fresh_clone).collect(),
            edges: self.edges.clone(),
        }
    }

    fn reheat(&mut self, alpha_target: f32) {
        self.alpha_target = alpha_target;
        self.running = true;
    }

    fn restart(&mut self) {
        self.alpha = 1.0;
        self.running = true;
    }

    /// Advances the layout by one frame. Returns whether any free node moved.
    fn step(&mut self, config: &LayoutConfig, delta_seconds: f32) -> bool {
        let node_count = self.nodes.len();
        if !self.running || node_count == 0 {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * config.alpha_decay;
        let energy = self.alpha;

        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.positions.extend(
            self.nodes
                .iter()
                .map(|node| node.pin.or(node.position).unwrap_or(Vec2::ZERO)),
        );
        let forces = &mut scratch.forces;
        let positions = &scratch.positions;

        if let Some(tree) = QuadTree::build(positions) {
            let repulsion = RepulsionParams {
                strength: config.repulsion * energy,
                softening: config.repulsion_softening,
                theta: config.barnes_hut_theta,
            };
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_repulsion(&tree, QuadTree::ROOT, index, positions, repulsion, force);
            }

            let max_radius = self.radii.iter().copied().fold(0.0_f32, f32::max);
            let reach = max_radius * 2.0 + config.collision_padding;
            accumulate_collisions(
                &tree,
                QuadTree::ROOT,
                QuadTree::ROOT,
                positions,
                &self.radii,
                CollisionParams {
                    strength: config.collision_strength,
                    padding: config.collision_padding,
                    reach_sq: reach * reach,
                },
                forces,
            );
        }

        let spring_strength = config.link_strength * energy;
        for link in &self.links {
            let (from, to) = (link.source, link.target);
            if from == to {
                continue;
            }

            let delta = positions[from] - positions[to];
            let distance = delta.length();
            if distance <= 0.0001 {
                continue;
            }
            let direction = delta / distance;

            let preferred = config.link_distance + self.radii[from] + self.radii[to];
            let spring = (distance - preferred) * spring_strength;
            let relative_velocity = self.nodes[from].velocity - self.nodes[to].velocity;
            let damping = relative_velocity.dot(direction) * config.link_damping;
            let correction = direction * (spring + damping);

            forces[from] -= correction;
            forces[to] += correction;
        }

        let center_pull = config.center_pull * energy;
        for (force, position) in forces.iter_mut().zip(positions) {
            *force -= *position * center_pull;
        }

        let time_step_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);
        let damping_factor = config.velocity_damping.powf(time_step_scale);
        let max_force_sq = config.max_force * config.max_force;
        let max_speed_sq = config.max_speed * config.max_speed;
        let mut any_motion = false;

        for (node, force) in self.nodes.iter_mut().zip(forces.iter()) {
            if let Some(pin) = node.pin {
                node.position = Some(pin);
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut force = *force;
            let force_sq = force.length_sq();
            if force_sq > max_force_sq {
                force *= config.max_force / force_sq.sqrt();
            }

            let mut velocity = (node.velocity + force * (0.055 * time_step_scale)) * damping_factor;
            let mut speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= config.max_speed / speed_sq.sqrt();
                speed_sq = max_speed_sq;
            }
            if speed_sq < 0.02 * 0.02 && force_sq < 0.08 * 0.08 {
                velocity = Vec2::ZERO;
                speed_sq = 0.0;
            }

            node.velocity = velocity;
            node.position = Some(node.position.unwrap_or(Vec2::ZERO) + velocity * time_step_scale);
            any_motion |= speed_sq > 0.000_001;
        }

        self.steps += 1;
        if self.alpha < config.alpha_min && self.alpha_target < config.alpha_min {
            self.running = false;
            debug!(
                "layout generation {} settled after {} steps",
                self.generation, self.steps
            );
        }

        any_motion
    }
}

/// Places every unpositioned node on a ring of radius ∝ √n, jittered by a
/// stable per-id offset so the same subset always seeds the same way.
fn seed_positions(nodes: &mut [Node], spread: f32) {
    let count = nodes.len();
    let ring = (count as f32).sqrt() * spread;
    for (index, node) in nodes.iter_mut().enumerate() {
        if node.position.is_some() {
            continue;
        }

        let angle = (index as f32 / count as f32) * TAU;
        let (jx, jy) = stable_pair(&node.id);
        node.position = Some(vec2(angle.cos(), angle.sin()) * ring + vec2(jx, jy) * (spread * 0.5));
        node.velocity = Vec2::ZERO;
    }
}

pub struct LayoutEngine {
    config: LayoutConfig,
    scale: RadiusScale,
    simulation: Option<Simulation>,
    generation: u64,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, max_pagerank: f64) -> Self {
        let config = config.sanitized();
        Self {
            scale: RadiusScale::new(max_pagerank, &config),
            config,
            simulation: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Applies new tuning to the running layout, radii included, and warms
    /// it up so it reacts.
    pub fn set_config(&mut self, config: LayoutConfig, max_pagerank: f64) {
        self.config = config.sanitized();
        self.scale = RadiusScale::new(max_pagerank, &self.config);
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.radii = simulation
                .nodes
                .iter()
                .map(|node| self.scale.radius(node.pagerank))
                .collect();
            simulation.alpha = simulation.alpha.max(self.config.drag_alpha_target);
            simulation.running = true;
        }
    }

    /// Stops whatever is running, then lays out `subgraph` from scratch.
    pub fn start(&mut self, subgraph: Subgraph) -> &Simulation {
        self.stop();
        self.generation += 1;
        debug!(
            "layout generation {} starting on {} nodes",
            self.generation,
            subgraph.nodes.len()
        );
        self.simulation.insert(Simulation::new(
            subgraph,
            &self.config,
            &self.scale,
            self.generation,
        ))
    }

    /// Drops the running simulation and returns its subset in bare-id form.
    pub fn stop(&mut self) -> Option<Subgraph> {
        let simulation = self.simulation.take()?;
        debug!("layout generation {} stopped", simulation.generation);
        Some(simulation.to_subgraph())
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.simulation.as_ref().is_some_and(Simulation::is_running)
    }

    pub fn tick(&mut self, delta_seconds: f32) -> bool {
        let config = self.config;
        self.simulation
            .as_mut()
            .is_some_and(|simulation| simulation.step(&config, delta_seconds))
    }

    /// Reheats the current layout to full energy.
    pub fn restart(&mut self) {
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.restart();
        }
    }

    /// Pins `id` where it stands and raises the energy so its neighbors
    /// react while it moves.
    pub fn begin_drag(&mut self, id: &str) -> Option<DragHandle> {
        let drag_alpha_target = self.config.drag_alpha_target;
        let simulation = self.simulation.as_mut()?;
        let index = simulation.index_of(id)?;

        let node = &mut simulation.nodes[index];
        node.pin = Some(node.position.unwrap_or(Vec2::ZERO));
        node.velocity = Vec2::ZERO;
        simulation.reheat(drag_alpha_target);

        Some(DragHandle {
            generation: simulation.generation,
            index,
        })
    }

    pub fn drag_to(&mut self, handle: &DragHandle, world: Vec2) -> bool {
        let Some(simulation) = self.simulation_for(handle) else {
            return false;
        };

        let node = &mut simulation.nodes[handle.index];
        node.pin = Some(world);
        node.position = Some(world);
        true
    }

    /// Releases the pin and lets the energy decay back to rest.
    pub fn end_drag(&mut self, handle: DragHandle) -> bool {
        let Some(simulation) = self.simulation_for(&handle) else {
            return false;
        };

        simulation.nodes[handle.index].pin = None;
        simulation.alpha_target = 0.0;
        true
    }

    fn simulation_for(&mut self, handle: &DragHandle) -> Option<&mut Simulation> {
        let simulation = self.simulation.as_mut()?;
        if simulation.generation != handle.generation || handle.index >= simulation.nodes.len() {
            debug!("ignoring drag from stale layout generation {}", handle.generation);
            return None;
        }
        Some(simulation)
    }
}

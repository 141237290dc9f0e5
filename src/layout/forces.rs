use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadTree;

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    pub(super) strength: f32,
    pub(super) softening: f32,
    pub(super) theta: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) padding: f32,
    pub(super) reach_sq: f32,
}

/// Unit vector from `b` towards `a`. Coincident points get a deterministic
/// golden-angle direction so the result is never zero or NaN.
pub(super) fn separation(delta: Vec2, a: usize, b: usize) -> (Vec2, f32) {
    let distance = delta.length();
    if distance > 0.0001 {
        (delta / distance, distance)
    } else {
        let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * TAU;
        (vec2(angle.cos(), angle.sin()), 0.0)
    }
}

fn repel(delta: Vec2, mass: f32, params: RepulsionParams, a: usize, b: usize) -> Vec2 {
    let (direction, distance) = separation(delta, a, b);
    direction * (params.strength * mass / (distance * distance + params.softening))
}

/// Many-body push on point `index`, approximating distant cells by their
/// centroid.
pub(super) fn accumulate_repulsion(
    tree: &QuadTree,
    cell: usize,
    index: usize,
    positions: &[Vec2],
    params: RepulsionParams,
    force: &mut Vec2,
) {
    let node = tree.cell(cell);
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];
    if node.is_leaf() {
        for &other in &node.points {
            if other != index {
                *force += repel(point - positions[other], 1.0, params, index, other);
            }
        }
        return;
    }

    let delta = point - node.centroid;
    let distance = delta.length().max(0.01);
    let far_enough = !node.square.contains(point) && node.square.side() / distance < params.theta;
    if far_enough {
        *force += repel(delta, node.mass, params, index, cell);
        return;
    }

    for child in node.children() {
        accumulate_repulsion(tree, child, index, positions, params, force);
    }
}

fn push_apart(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let (direction, distance) = separation(positions[from] - positions[to], from, to);
    let min_distance = radii[from] + radii[to] + params.padding;
    if distance < min_distance {
        let push = direction * ((min_distance - distance) * params.strength);
        forces[from] += push;
        forces[to] -= push;
    }
}

/// Pairwise overlap resolution between the points of two cells, pruning
/// cell pairs that are further apart than any two circles could reach.
pub(super) fn accumulate_collisions(
    tree: &QuadTree,
    a: usize,
    b: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let (cell_a, cell_b) = (tree.cell(a), tree.cell(b));
    if cell_a.square.gap_sq(cell_b.square) > params.reach_sq {
        return;
    }

    match (cell_a.is_leaf(), cell_b.is_leaf(), a == b) {
        (true, true, true) => {
            for (offset, &from) in cell_a.points.iter().enumerate() {
                for &to in &cell_a.points[offset + 1..] {
                    push_apart(from, to, positions, radii, params, forces);
                }
            }
        }
        (true, true, false) => {
            for &from in &cell_a.points {
                for &to in &cell_b.points {
                    push_apart(from, to, positions, radii, params, forces);
                }
            }
        }
        (_, _, true) => {
            let children = cell_a.children().collect::<Vec<_>>();
            for (offset, &first) in children.iter().enumerate() {
                for &second in &children[offset..] {
                    accumulate_collisions(tree, first, second, positions, radii, params, forces);
                }
            }
        }
        (leaf_a, leaf_b, false) => {
            let split_a = !leaf_a && (leaf_b || cell_a.square.half >= cell_b.square.half);
            if split_a {
                for child in cell_a.children() {
                    accumulate_collisions(tree, child, b, positions, radii, params, forces);
                }
            } else {
                for child in cell_b.children() {
                    accumulate_collisions(tree, a, child, positions, radii, params, forces);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPULSION: RepulsionParams = RepulsionParams {
        strength: 1000.0,
        softening: 1.0,
        theta: 0.7,
    };

    fn brute_force_collisions(positions: &[Vec2], radii: &[f32], params: CollisionParams) -> Vec<Vec2> {
        let mut forces = vec![Vec2::ZERO; positions.len()];
        for from in 0..positions.len() {
            for to in (from + 1)..positions.len() {
                push_apart(from, to, positions, radii, params, &mut forces);
            }
        }
        forces
    }

    #[test]
    fn separation_never_returns_zero() {
        let (direction, distance) = separation(Vec2::ZERO, 3, 7);
        assert_eq!(distance, 0.0);
        assert!((direction.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn repulsion_pushes_points_apart() {
        let positions = vec![vec2(-10.0, 0.0), vec2(10.0, 0.0)];
        let tree = QuadTree::build(&positions).expect("finite");
        let mut left = Vec2::ZERO;
        let mut right = Vec2::ZERO;
        accumulate_repulsion(&tree, QuadTree::ROOT, 0, &positions, REPULSION, &mut left);
        accumulate_repulsion(&tree, QuadTree::ROOT, 1, &positions, REPULSION, &mut right);
        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left.x + right.x).abs() < 1e-3);
    }

    #[test]
    fn tree_collisions_match_brute_force() {
        let positions = (0..60)
            .map(|index| vec2((index % 8) as f32 * 6.0, (index / 8) as f32 * 6.0))
            .collect::<Vec<_>>();
        let radii = vec![4.0; positions.len()];
        let params = CollisionParams {
            strength: 1.0,
            padding: 1.0,
            reach_sq: (2.0 * 4.0 + 1.0_f32).powi(2),
        };

        let tree = QuadTree::build(&positions).expect("finite");
        let mut forces = vec![Vec2::ZERO; positions.len()];
        accumulate_collisions(
            &tree,
            QuadTree::ROOT,
            QuadTree::ROOT,
            &positions,
            &radii,
            params,
            &mut forces,
        );

        let expected = brute_force_collisions(&positions, &radii, params);
        for (got, want) in forces.iter().zip(&expected) {
            assert!((*got - *want).length() < 1e-3, "{got:?} != {want:?}");
        }
    }
}

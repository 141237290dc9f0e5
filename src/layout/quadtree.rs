use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

/// Axis-aligned square region of the layout plane.
#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (
                vec2(f32::INFINITY, f32::INFINITY),
                vec2(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half && (point.y - self.center.y).abs() <= self.half
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    /// Squared gap between two squares; zero when they touch or overlap.
    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half + other.half;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        dx * dx + dy * dy
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half * 0.5;
        let x = if quadrant & 1 == 0 { -quarter } else { quarter };
        let y = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(x, y),
            half: quarter,
        }
    }
}

pub(super) struct Cell {
    pub(super) square: Square,
    pub(super) centroid: Vec2,
    pub(super) mass: f32,
    /// Point indices; only populated on leaves.
    pub(super) points: Vec<usize>,
    children: [Option<usize>; 4],
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = usize> + '_ {
        self.children.iter().flatten().copied()
    }
}

/// Barnes-Hut quadtree stored as an arena; cell 0 is the root.
pub(super) struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    pub(super) const ROOT: usize = 0;

    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::enclosing(positions)?;
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() / LEAF_CAPACITY * 2 + 1),
        };
        tree.insert(square, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    pub(super) fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    fn insert(
        &mut self,
        square: Square,
        points: Vec<usize>,
        positions: &[Vec2],
        depth: usize,
    ) -> usize {
        let mass = points.len() as f32;
        let centroid = if points.is_empty() {
            square.center
        } else {
            points
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / mass
        };

        let cell_index = self.cells.len();
        self.cells.push(Cell {
            square,
            centroid,
            mass,
            points,
            children: [None; 4],
        });

        if depth >= MAX_DEPTH || self.cells[cell_index].points.len() <= LEAF_CAPACITY {
            return cell_index;
        }

        // Coincident points can never be separated by splitting.
        let points = &self.cells[cell_index].points;
        let first = positions[points[0]];
        if points.iter().all(|&index| positions[index] == first) {
            return cell_index;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in points {
            buckets[square.quadrant_of(positions[index])].push(index);
        }

        self.cells[cell_index].points.clear();
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let child = self.insert(square.quadrant(quadrant), bucket, positions, depth + 1);
            self.cells[cell_index].children[quadrant] = Some(child);
        }

        cell_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|index| vec2((index % 10) as f32 * 15.0, (index / 10) as f32 * 15.0))
            .collect()
    }

    fn leaf_points(tree: &QuadTree, cell: usize, out: &mut Vec<usize>) {
        let node = tree.cell(cell);
        out.extend(&node.points);
        for child in node.children() {
            leaf_points(tree, child, out);
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let positions = grid(73);
        let tree = QuadTree::build(&positions).expect("finite points");

        let mut seen = Vec::new();
        leaf_points(&tree, QuadTree::ROOT, &mut seen);
        seen.sort_unstable();
        assert_eq!(seen, (0..73).collect::<Vec<_>>());
        assert_eq!(tree.cell(QuadTree::ROOT).mass, 73.0);
        assert!(!tree.cell(QuadTree::ROOT).is_leaf());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![vec2(5.0, 5.0); 40];
        let tree = QuadTree::build(&positions).expect("finite points");
        assert!(tree.cell(QuadTree::ROOT).is_leaf());
        assert_eq!(tree.cell(QuadTree::ROOT).points.len(), 40);
    }

    #[test]
    fn clusters_inside_one_quadrant_are_still_split() {
        let mut positions = (0..19).map(|index| vec2(index as f32, 0.0)).collect::<Vec<_>>();
        positions.push(vec2(1_000.0, 1_000.0));
        let tree = QuadTree::build(&positions).expect("finite points");

        fn largest_leaf(tree: &QuadTree, cell: usize) -> usize {
            let node = tree.cell(cell);
            node.children()
                .map(|child| largest_leaf(tree, child))
                .max()
                .unwrap_or(node.points.len())
        }
        assert!(largest_leaf(&tree, QuadTree::ROOT) <= LEAF_CAPACITY);
    }

    #[test]
    fn non_finite_points_yield_no_tree() {
        assert!(QuadTree::build(&[vec2(f32::NAN, 0.0)]).is_none());
        assert!(QuadTree::build(&[]).is_none());
    }

    #[test]
    fn square_gap_is_zero_for_overlapping_regions() {
        let a = Square {
            center: vec2(0.0, 0.0),
            half: 5.0,
        };
        let b = Square {
            center: vec2(8.0, 0.0),
            half: 5.0,
        };
        let c = Square {
            center: vec2(20.0, 0.0),
            half: 5.0,
        };
        assert_eq!(a.gap_sq(b), 0.0);
        assert_eq!(a.gap_sq(c), 100.0);
        assert!(a.contains(vec2(5.0, -5.0)));
    }
}

use super::*;
use tracing::debug;

/// The quadrant of a drawing that should end up in the upper right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperRight,
        Quadrant::UpperLeft,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// Signs of x and y inside the quadrant. Multiplying a drawing's coordinates by
    /// these moves the quadrant to the upper right.
    pub fn signs(&self) -> (i32, i32) {
        match self {
            Quadrant::UpperRight => (1, 1),
            Quadrant::UpperLeft => (-1, 1),
            Quadrant::LowerLeft => (-1, -1),
            Quadrant::LowerRight => (1, -1),
        }
    }

    pub fn opposite(&self) -> Quadrant {
        match self {
            Quadrant::UpperRight => Quadrant::LowerLeft,
            Quadrant::UpperLeft => Quadrant::LowerRight,
            Quadrant::LowerLeft => Quadrant::UpperRight,
            Quadrant::LowerRight => Quadrant::UpperLeft,
        }
    }

    /// Is bringing this quadrant to the upper right a reflection rather than a rotation?
    pub fn is_mirrored(&self) -> bool {
        let (sx, sy) = self.signs();
        sx * sy < 0
    }

    fn index(&self) -> usize {
        match self {
            Quadrant::UpperRight => 0,
            Quadrant::UpperLeft => 1,
            Quadrant::LowerLeft => 2,
            Quadrant::LowerRight => 3,
        }
    }
}

/// Share of each quadrant's rings around `centre`, in quarters of a ring.
///
/// A ring inside a quadrant counts 4, a ring on an axis counts 2 towards each quadrant
/// it borders, and a ring on the centre counts 1 towards every quadrant.
pub fn quadrant_counts(grid: &Grid, centre: (i32, i32)) -> [u32; 4] {
    let mut counts = [0; 4];
    for &(x, y) in grid.cells().keys() {
        let (dx, dy) = (x - centre.0, y - centre.1);
        for quadrant in Quadrant::ALL {
            let (sx, sy) = quadrant.signs();
            let (a, b) = (sx * dx, sy * dy);
            counts[quadrant.index()] += match (a.signum(), b.signum()) {
                (1, 1) => 4,
                (0, 1) | (1, 0) => 2,
                (0, 0) => 1,
                _ => 0,
            };
        }
    }
    counts
}

/// A candidate way of orienting a drawing: which grid, around which row, with which
/// quadrant moved to the upper right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub grid: usize,
    pub chain: Chain,
    pub quadrant: Quadrant,
}

impl Orientation {
    /// Coordinates of a cell once this orientation is applied.
    pub fn transform(&self, (x, y): (i32, i32)) -> (i32, i32) {
        let (sx, sy) = self.quadrant.signs();
        let (cx, cy) = self.chain.midpoint();
        (sx * (x - cx), sy * (y - cy))
    }
}

/// Orientations surviving the quadrant rules: as many rings as possible in the upper
/// right quadrant, then as few as possible in the lower left one, then as many as
/// possible above the horizontal row.
pub fn preferred_orientations(grids: &[Grid]) -> Vec<Orientation> {
    let mut scored = Vec::new();
    for (index, grid) in grids.iter().enumerate() {
        for chain in grid.longest_rows() {
            let centre = chain.midpoint();
            let counts = quadrant_counts(grid, centre);
            for quadrant in Quadrant::ALL {
                let (_, sy) = quadrant.signs();
                let above = grid
                    .cells()
                    .keys()
                    .filter(|&&(_, y)| sy * (y - centre.1) > 0)
                    .count();
                let orientation = Orientation {
                    grid: index,
                    chain,
                    quadrant,
                };
                scored.push((
                    orientation,
                    counts[quadrant.index()],
                    counts[quadrant.opposite().index()],
                    above,
                ));
            }
        }
    }

    let most_upper_right = scored.iter().map(|s| s.1).max().unwrap_or(0);
    scored.retain(|s| s.1 == most_upper_right);
    let fewest_lower_left = scored.iter().map(|s| s.2).min().unwrap_or(0);
    scored.retain(|s| s.2 == fewest_lower_left);
    let most_above = scored.iter().map(|s| s.3).max().unwrap_or(0);
    scored.retain(|s| s.3 == most_above);

    debug!(
        "{} orientations kept ({} upper right, {} lower left, {} above the row)",
        scored.len(),
        most_upper_right,
        fewest_lower_left,
        most_above
    );
    scored.into_iter().map(|s| s.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn grids_for(frag: &Fragment) -> Vec<Grid> {
        let mut rings = ring_system(frag);
        let (start, bond) = choose_start(&rings).unwrap();
        orient_rings(frag, &mut rings, start, bond).unwrap();
        let tables = least_distorted(search_orientations(&rings, start, bond).unwrap());
        let (_, axes) = longest_chains(&tables);
        project_all(&tables, &axes, start).unwrap()
    }

    #[test]
    fn test_quadrant_signs() {
        for quadrant in Quadrant::ALL {
            let (sx, sy) = quadrant.signs();
            let (ox, oy) = quadrant.opposite().signs();
            assert_eq!((sx, sy), (-ox, -oy));
        }
        assert!(Quadrant::UpperLeft.is_mirrored());
        assert!(Quadrant::LowerRight.is_mirrored());
        assert!(!Quadrant::LowerLeft.is_mirrored());
    }

    #[test]
    fn test_symmetric_counts() {
        let frag = parse_smiles(ANTHRACENE).unwrap();
        let grids = grids_for(&frag);
        let row = grids[0].longest_rows()[0];
        // Two rings on the axis and one on the centre: 2 + 1 in every quadrant
        assert_eq!(quadrant_counts(&grids[0], row.midpoint()), [3, 3, 3, 3]);
        assert_eq!(preferred_orientations(&grids).len(), 4);
    }

    #[test]
    fn test_fewest_lower_left_breaks_upper_right_tie() {
        // A two ring row with one ring off each of three corners
        let grid = Grid::from_cells(&[
            ((0, 0), 0),
            ((2, 0), 1),
            ((3, 1), 2),
            ((-1, 1), 3),
            ((3, -1), 4),
        ]);
        let counts = quadrant_counts(&grid, (1, 0));
        assert_eq!(counts, [6, 6, 2, 6]);

        let kept = preferred_orientations(&[grid]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].quadrant, Quadrant::UpperRight);
        assert_eq!(kept[0].chain.midpoint(), (1, 0));
    }

    #[test]
    fn test_most_above_row_breaks_remaining_tie() {
        // Both drawings have 6 quarters upper right and 2 lower left, but the second
        // stacks two rings above the row where the first has one
        let single = Grid::from_cells(&[((0, 0), 0), ((2, 0), 1), ((3, 1), 2)]);
        let stacked = Grid::from_cells(&[((0, 0), 0), ((2, 0), 1), ((1, 1), 2), ((1, 3), 3)]);
        assert_eq!(quadrant_counts(&single, (1, 0)), [6, 2, 2, 2]);
        assert_eq!(quadrant_counts(&stacked, (1, 0)), [6, 6, 2, 2]);

        let kept = preferred_orientations(&[single, stacked]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|o| o.grid == 1));
        let quadrants: Vec<Quadrant> = kept.iter().map(|o| o.quadrant).collect();
        assert_eq!(quadrants, vec![Quadrant::UpperRight, Quadrant::UpperLeft]);
    }

    #[test]
    fn test_angular_system_prefers_upper_right() {
        let frag = hexagon_chain(&[2]);
        let grids = grids_for(&frag);
        let kept = preferred_orientations(&grids);
        assert!(!kept.is_empty());
        for orientation in &kept {
            let grid = &grids[orientation.grid];
            let counts = quadrant_counts(grid, orientation.chain.midpoint());
            assert_eq!(counts[orientation.quadrant.index()], 6);
            // The third ring ends up above the row
            let above = grid
                .cells()
                .keys()
                .filter(|&&cell| orientation.transform(cell).1 > 0)
                .count();
            assert_eq!(above, 1);
        }
    }
}

use super::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, instrument, trace};

/// Sparse placement of rings on the drawing grid, keyed by cell.
pub type RingMap = BTreeMap<(i32, i32), RingId>;

/// A straight horizontal run of rings on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Chain {
    pub length: usize,
    pub start_x: i32,
    pub y: i32,
}

impl Chain {
    /// Grid coordinates of the middle of the chain.
    pub fn midpoint(&self) -> (i32, i32) {
        (self.start_x + self.length as i32 - 1, self.y)
    }
}

/// A bearing that should be drawn horizontally, and the table it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChainAxis {
    pub table: usize,
    pub bearing: Direction,
}

/// Length of the straight chain that leaves `entry.ring` through `entry`.
fn straight_chain_length(table: &ConnectivityTable, entry: &TableEntry) -> usize {
    let mut visited = BTreeSet::from([entry.ring, entry.neighbour]);
    let mut current = entry.neighbour;
    while let Some(next) = table
        .entries_from(current)
        .find(|e| e.direction == entry.direction && !visited.contains(&e.neighbour))
    {
        visited.insert(next.neighbour);
        current = next.neighbour;
    }
    visited.len()
}

/// Bearings along which the longest straight chains of rings run, for every table.
///
/// Returns the longest chain length and every (table, bearing) pair achieving it. A
/// bearing and its opposite describe the same chain and are reported once.
pub fn longest_chains(tables: &[ConnectivityTable]) -> (usize, Vec<ChainAxis>) {
    let mut best = 0;
    let mut axes: BTreeSet<ChainAxis> = BTreeSet::new();
    for (index, table) in tables.iter().enumerate() {
        for entry in table.entries() {
            let length = straight_chain_length(table, entry);
            let axis = ChainAxis {
                table: index,
                bearing: entry.direction.axis(),
            };
            if length > best {
                best = length;
                axes.clear();
            }
            if length == best {
                axes.insert(axis);
            }
        }
    }
    debug!("longest chain has {} rings along {} axes", best, axes.len());
    (best, axes.into_iter().collect())
}

/// Ring positions of one drawing of the ring system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: RingMap,
    positions: BTreeMap<RingId, (i32, i32)>,
}

impl Grid {
    /// Place every ring of `table` on a grid, drawing `axis` horizontally.
    ///
    /// Returns `None` when two rings would land in the same cell.
    pub fn project(table: &ConnectivityTable, axis: Direction, start: RingId) -> Option<Self> {
        let mut grid = Grid {
            cells: RingMap::new(),
            positions: BTreeMap::new(),
        };
        grid.cells.insert((0, 0), start);
        grid.positions.insert(start, (0, 0));

        let mut queue = VecDeque::from([start]);
        while let Some(ring) = queue.pop_front() {
            let (x, y) = grid.positions[&ring];
            for entry in table.entries_from(ring) {
                if grid.positions.contains_key(&entry.neighbour) {
                    continue;
                }
                let (dx, dy) = entry.direction.rotate(axis).delta();
                let cell = (x + dx, y + dy);
                if let Some(&other) = grid.cells.get(&cell) {
                    trace!("rings {} and {} collide at {:?}", other, entry.neighbour, cell);
                    return None;
                }
                grid.cells.insert(cell, entry.neighbour);
                grid.positions.insert(entry.neighbour, cell);
                queue.push_back(entry.neighbour);
            }
        }
        Some(grid)
    }

    /// A grid with rings placed by hand.
    #[cfg(test)]
    pub(crate) fn from_cells(cells: &[((i32, i32), RingId)]) -> Self {
        Grid {
            cells: cells.iter().copied().collect(),
            positions: cells.iter().map(|&(cell, ring)| (ring, cell)).collect(),
        }
    }

    pub fn cells(&self) -> &RingMap {
        &self.cells
    }

    pub fn position(&self, ring: RingId) -> Option<(i32, i32)> {
        self.positions.get(&ring).copied()
    }

    pub fn ring_count(&self) -> usize {
        self.positions.len()
    }

    /// The horizontal runs of rings with the greatest length.
    pub fn longest_rows(&self) -> Vec<Chain> {
        let mut rows: Vec<Chain> = Vec::new();
        for &(x, y) in self.cells.keys() {
            if self.cells.contains_key(&(x - 2, y)) {
                continue;
            }
            let mut length = 1;
            while self.cells.contains_key(&(x + 2 * length as i32, y)) {
                length += 1;
            }
            rows.push(Chain {
                length,
                start_x: x,
                y,
            });
        }
        let longest = rows.iter().map(|c| c.length).max().unwrap_or(0);
        rows.retain(|c| c.length == longest);
        rows
    }
}

/// Project every candidate axis, dropping those whose drawing overlaps itself.
#[instrument(skip_all, fields(axes = axes.len()))]
pub fn project_all(
    tables: &[ConnectivityTable],
    axes: &[ChainAxis],
    start: RingId,
) -> Result<Vec<Grid>, NumberingError> {
    let mut grids: Vec<Grid> = Vec::new();
    for axis in axes {
        let table = tables
            .get(axis.table)
            .ok_or_else(|| NumberingError::invariant("chain refers to a missing table"))?;
        if let Some(grid) = Grid::project(table, axis.bearing, start) {
            if grid.ring_count() != table.ring_count() {
                return Err(NumberingError::invariant(format!(
                    "drawing placed {} of {} rings",
                    grid.ring_count(),
                    table.ring_count()
                )));
            }
            if !grids.contains(&grid) {
                grids.push(grid);
            }
        }
    }
    if grids.is_empty() {
        return Err(NumberingError::unsupported(
            "cannot number overlapping ring systems such as helicenes",
        ));
    }
    debug!("{} distinct non-overlapping drawings", grids.len());
    Ok(grids)
}

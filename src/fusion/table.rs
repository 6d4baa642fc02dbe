use super::*;
use petgraph::graph::EdgeIndex;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, instrument, trace};

/// One row of a connectivity table: ring `ring`, drawn as `shape`, sees `neighbour`
/// across `bond` at bearing `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub ring: RingId,
    pub shape: RingShape,
    pub neighbour: RingId,
    pub bond: EdgeIndex,
    pub direction: Direction,
}

/// A complete assignment of drawings and bearings to a ring system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityTable {
    entries: Vec<TableEntry>,
    used: BTreeSet<RingId>,
}

impl ConnectivityTable {
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn entries_from(&self, ring: RingId) -> impl Iterator<Item = &TableEntry> + '_ {
        self.entries.iter().filter(move |e| e.ring == ring)
    }

    /// The entry looking back across the same bond, if the other ring has been visited.
    pub fn reflexive(&self, entry: &TableEntry) -> Option<&TableEntry> {
        self.entries
            .iter()
            .find(|e| e.ring == entry.neighbour && e.neighbour == entry.ring && e.bond == entry.bond)
    }

    pub fn ring_count(&self) -> usize {
        self.used.len()
    }

    /// Number of reflexive pairs whose bearings are not exact opposites.
    pub fn distortions(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                self.reflexive(e)
                    .map(|back| back.direction != e.direction.opposite())
                    .unwrap_or(false)
            })
            .count()
    }
}

/// The ring the search starts from, and the bond it is entered through.
///
/// The ring is a terminal one (fewest fusion bonds). The bond is one of its unfused
/// bonds, preferably one whose neighbouring bonds are unfused too.
pub fn choose_start(rings: &[Ring]) -> Result<(RingId, EdgeIndex), NumberingError> {
    let start = rings
        .iter()
        .enumerate()
        .min_by_key(|(_, ring)| ring.fused_bond_count())
        .map(|(id, _)| id)
        .ok_or_else(|| NumberingError::invariant("no rings to start from"))?;

    let ring = &rings[start];
    let bonds = ring.bonds();
    let n = bonds.len();
    let unfused: Vec<usize> = (0..n).filter(|&i| !ring.is_fused(bonds[i])).collect();
    let isolated = unfused
        .iter()
        .copied()
        .find(|&i| !ring.is_fused(bonds[(i + n - 1) % n]) && !ring.is_fused(bonds[(i + 1) % n]));

    let bond = isolated
        .or_else(|| unfused.first().copied())
        .map(|i| bonds[i])
        .ok_or_else(|| NumberingError::invariant("terminal ring has no unfused bond"))?;
    Ok((start, bond))
}

/// Give every ring's cyclic lists the same rotational sense, spreading out from the
/// start ring: a ring entered through the bond `a -> b` of its parent walks that bond
/// as `b -> a`.
pub fn orient_rings(
    frag: &Fragment,
    rings: &mut [Ring],
    start: RingId,
    start_bond: EdgeIndex,
) -> Result<(), NumberingError> {
    let (first, _) = frag
        .bond_endpoints(start_bond)
        .ok_or_else(|| NumberingError::invariant("starting bond is not in the fragment"))?;
    rings[start].make_cyclic_lists(start_bond, first)?;

    let mut oriented = vec![false; rings.len()];
    oriented[start] = true;
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let neighbours = rings[current].neighbours().to_vec();
        for (next, bond) in neighbours {
            if oriented[next] {
                continue;
            }
            let ring = &rings[current];
            let k = ring
                .cyclic_position(bond)
                .ok_or_else(|| NumberingError::invariant("fusion bond missing from its ring"))?;
            let far = ring.cyclic_atoms()[(k + 1) % ring.size()];
            rings[next].make_cyclic_lists(bond, far)?;
            oriented[next] = true;
            queue.push_back(next);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    ring: RingId,
    incoming: Direction,
    entry: EdgeIndex,
}

#[derive(Debug, Clone)]
struct SearchState {
    table: ConnectivityTable,
    pending: Vec<Visit>,
}

/// Cyclic distance of `bond` from `entry`, counter-clockwise around `ring`.
fn cyclic_distance(ring: &Ring, entry: EdgeIndex, bond: EdgeIndex) -> Result<usize, NumberingError> {
    let missing = || NumberingError::invariant("bond is not part of the ring being drawn");
    let from = ring.cyclic_position(entry).ok_or_else(missing)?;
    let to = ring.cyclic_position(bond).ok_or_else(missing)?;
    Ok((to + ring.size() - from) % ring.size())
}

/// Explore every legal way of drawing the ring system, starting from `start` entered
/// heading east through `start_bond`.
///
/// Each ring is drawn once per state; a ring with several legal drawings forks the state.
/// Every state runs until it has no pending visits and becomes a finished table.
#[instrument(skip_all, fields(rings = rings.len(), start = start))]
pub fn search_orientations(
    rings: &[Ring],
    start: RingId,
    start_bond: EdgeIndex,
) -> Result<Vec<ConnectivityTable>, NumberingError> {
    let mut finished = Vec::new();
    let mut worklist = vec![SearchState {
        table: ConnectivityTable::default(),
        pending: vec![Visit {
            ring: start,
            incoming: Direction::EAST,
            entry: start_bond,
        }],
    }];

    while let Some(mut state) = worklist.pop() {
        let Some(visit) = state.pending.pop() else {
            finished.push(state.table);
            continue;
        };
        if !state.table.used.insert(visit.ring) {
            worklist.push(state);
            continue;
        }

        let ring = &rings[visit.ring];
        let mut fused_distances = Vec::new();
        for &bond in ring.fused_bonds() {
            let distance = cyclic_distance(ring, visit.entry, bond)?;
            if distance != 0 {
                fused_distances.push(distance);
            }
        }
        let shapes = legal_shapes(ring.size(), &fused_distances)?;
        trace!("ring {} can be drawn as {:?}", visit.ring, shapes);

        for shape in shapes {
            let mut branch = state.clone();
            for &(neighbour, bond) in ring.neighbours() {
                let distance = cyclic_distance(ring, visit.entry, bond)?;
                let direction = if distance == 0 {
                    visit.incoming.opposite()
                } else {
                    visit
                        .incoming
                        .combine(relative_direction(ring.size(), shape, distance)?)
                };
                branch.table.entries.push(TableEntry {
                    ring: visit.ring,
                    shape,
                    neighbour,
                    bond,
                    direction,
                });
            }
            for &(neighbour, bond) in ring.neighbours().iter().rev() {
                if branch.table.used.contains(&neighbour) {
                    continue;
                }
                let direction = branch
                    .table
                    .entries
                    .iter()
                    .rev()
                    .find(|e| e.ring == visit.ring && e.bond == bond)
                    .map(|e| e.direction)
                    .ok_or_else(|| NumberingError::invariant("neighbour has no bearing"))?;
                branch.pending.push(Visit {
                    ring: neighbour,
                    incoming: direction,
                    entry: bond,
                });
            }
            worklist.push(branch);
        }
    }

    debug!("found {} connectivity tables", finished.len());
    Ok(finished)
}

/// Keep only the tables with the fewest mismatched reflexive bearings.
pub fn least_distorted(tables: Vec<ConnectivityTable>) -> Vec<ConnectivityTable> {
    let fewest = tables.iter().map(|t| t.distortions()).min().unwrap_or(0);
    let kept: Vec<ConnectivityTable> = tables
        .into_iter()
        .filter(|t| t.distortions() == fewest)
        .collect();
    debug!("{} tables with {} distortions", kept.len(), fewest);
    kept
}

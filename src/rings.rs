use super::*;
use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Index of a ring in the ring list of a fragment.
pub type RingId = usize;

/// A ring of a fused ring system.
///
/// Membership never changes once perceived. The cyclic lists are a view of the same
/// cycle starting from a chosen bond and atom: `cyclic_bonds[k]` always joins
/// `cyclic_atoms[k]` and `cyclic_atoms[k + 1]` (wrapping around).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    bonds: Vec<EdgeIndex>,
    cyclic_atoms: Vec<NodeIndex>,
    cyclic_bonds: Vec<EdgeIndex>,
    fused_bonds: Vec<EdgeIndex>,
    neighbours: Vec<(RingId, EdgeIndex)>,
}

impl Ring {
    /// Build a ring from its atoms in cycle order. Fails if two consecutive atoms
    /// are not bonded in the fragment.
    pub fn from_cycle(frag: &Fragment, atoms: Vec<NodeIndex>) -> Result<Self, NumberingError> {
        let n = atoms.len();
        let mut bonds = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (atoms[i], atoms[(i + 1) % n]);
            let bond = frag.bond_between(a, b).ok_or_else(|| {
                NumberingError::invariant(format!(
                    "ring atoms {} and {} are not bonded",
                    a.index(),
                    b.index()
                ))
            })?;
            bonds.push(bond);
        }
        Ok(Self {
            cyclic_atoms: atoms.clone(),
            cyclic_bonds: bonds.clone(),
            atoms,
            bonds,
            fused_bonds: Vec::new(),
            neighbours: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[EdgeIndex] {
        &self.bonds
    }

    pub fn cyclic_atoms(&self) -> &[NodeIndex] {
        &self.cyclic_atoms
    }

    pub fn cyclic_bonds(&self) -> &[EdgeIndex] {
        &self.cyclic_bonds
    }

    /// Bonds this ring shares with another ring.
    pub fn fused_bonds(&self) -> &[EdgeIndex] {
        &self.fused_bonds
    }

    pub fn fused_bond_count(&self) -> usize {
        self.fused_bonds.len()
    }

    /// The rings fused to this one, with the bond each fusion goes through.
    pub fn neighbours(&self) -> &[(RingId, EdgeIndex)] {
        &self.neighbours
    }

    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.bonds.contains(&bond)
    }

    pub fn is_fused(&self, bond: EdgeIndex) -> bool {
        self.fused_bonds.contains(&bond)
    }

    /// Position of a bond in the cyclic bond list.
    pub fn cyclic_position(&self, bond: EdgeIndex) -> Option<usize> {
        self.cyclic_bonds.iter().position(|&b| b == bond)
    }

    /// The ring on the other side of a fused bond.
    pub fn neighbour_via(&self, bond: EdgeIndex) -> Option<RingId> {
        self.neighbours
            .iter()
            .find(|(_, b)| *b == bond)
            .map(|(ring, _)| *ring)
    }

    /// Re-establish the cyclic lists so they start with `bond`, walking away from `atom`.
    pub fn make_cyclic_lists(
        &mut self,
        bond: EdgeIndex,
        atom: NodeIndex,
    ) -> Result<(), NumberingError> {
        let n = self.size();
        let i = self
            .bonds
            .iter()
            .position(|&b| b == bond)
            .ok_or_else(|| NumberingError::invariant("starting bond is not in the ring"))?;

        let (forward, start) = if self.atoms[i] == atom {
            (true, i)
        } else if self.atoms[(i + 1) % n] == atom {
            (false, (i + 1) % n)
        } else {
            return Err(NumberingError::invariant(
                "starting atom is not an endpoint of the starting bond",
            ));
        };

        self.cyclic_atoms.clear();
        self.cyclic_bonds.clear();
        for step in 0..n {
            if forward {
                self.cyclic_atoms.push(self.atoms[(start + step) % n]);
                self.cyclic_bonds.push(self.bonds[(i + step) % n]);
            } else {
                self.cyclic_atoms.push(self.atoms[(start + n - step) % n]);
                self.cyclic_bonds.push(self.bonds[(i + n - step) % n]);
            }
        }
        Ok(())
    }
}

/// Register every pair of rings sharing a bond as each other's neighbours.
pub fn link_fused_neighbours(rings: &mut [Ring]) -> Result<(), NumberingError> {
    if let Some(ring) = rings.iter().find(|r| r.size() <= 2) {
        return Err(NumberingError::invariant(format!(
            "ring of size {} cannot be numbered",
            ring.size()
        )));
    }
    for ring in rings.iter_mut() {
        ring.fused_bonds.clear();
        ring.neighbours.clear();
    }

    for i in 0..rings.len() {
        for j in (i + 1)..rings.len() {
            let shared: Vec<EdgeIndex> = rings[i]
                .bonds
                .iter()
                .copied()
                .filter(|&b| rings[j].contains_bond(b))
                .collect();
            for bond in shared {
                trace!("rings {} and {} are fused through bond {}", i, j, bond.index());
                rings[i].neighbours.push((j, bond));
                rings[j].neighbours.push((i, bond));
                for ring in [i, j] {
                    if !rings[ring].fused_bonds.contains(&bond) {
                        rings[ring].fused_bonds.push(bond);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Number of bonds of an atom that lie in at least one ring.
pub fn ring_bond_count(frag: &Fragment, rings: &[Ring], atom: NodeIndex) -> usize {
    frag.bonds_of(atom)
        .filter(|&b| rings.iter().any(|r| r.contains_bond(b)))
        .count()
}

/// Number of independent cycles of the fragment's graph.
pub fn cycle_rank(frag: &Fragment) -> usize {
    let components = connected_components(frag.graph());
    (frag.bond_total() + components).saturating_sub(frag.atom_count())
}

/// Perceive the smallest set of smallest rings of a fragment.
///
/// Candidate cycles are built from shortest paths (Horton's method), sorted by size,
/// and kept while they are linearly independent over GF(2). Rings come back smallest
/// first; ties are broken by their atoms' node indices.
pub fn smallest_rings(frag: &Fragment) -> Vec<Ring> {
    let wanted = cycle_rank(frag);
    if wanted == 0 {
        return Vec::new();
    }

    let mut basis = CycleBasis::new(frag.bond_total());
    let mut cycles: Vec<Vec<NodeIndex>> = Vec::with_capacity(wanted);
    for cycle in candidate_cycles(frag) {
        if cycles.len() == wanted {
            break;
        }
        if basis.insert(frag, &cycle) {
            cycles.push(cycle);
        }
    }
    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    debug!("perceived {} rings (cycle rank {})", cycles.len(), wanted);

    cycles
        .into_iter()
        .filter_map(|cycle| Ring::from_cycle(frag, cycle).ok())
        .collect()
}

/// Shortest path trees from every atom: distance and predecessor per target.
struct ShortestPaths {
    dist: Vec<Vec<u32>>,
    pred: Vec<Vec<Option<NodeIndex>>>,
}

impl ShortestPaths {
    fn new(frag: &Fragment) -> Self {
        let n = frag.atom_count();
        let mut dist = vec![vec![u32::MAX; n]; n];
        let mut pred = vec![vec![None; n]; n];
        for source in 0..n {
            let mut queue = VecDeque::from([NodeIndex::new(source)]);
            dist[source][source] = 0;
            while let Some(current) = queue.pop_front() {
                let d = dist[source][current.index()];
                for next in frag.neighbours(current) {
                    if dist[source][next.index()] == u32::MAX {
                        dist[source][next.index()] = d + 1;
                        pred[source][next.index()] = Some(current);
                        queue.push_back(next);
                    }
                }
            }
        }
        Self { dist, pred }
    }

    /// Path from `source` to `target`, both included.
    fn path(&self, source: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        let mut path = vec![target];
        let mut current = target;
        while current != source {
            current = self.pred[source.index()][current.index()]?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Horton candidate cycles: for each bond (u, v) and atom w, the cycle made of the
/// shortest paths w..u and w..v plus the bond, if those paths only meet at w.
fn candidate_cycles(frag: &Fragment) -> Vec<Vec<NodeIndex>> {
    let paths = ShortestPaths::new(frag);
    let mut candidates = Vec::new();

    for bond in frag.bonds() {
        let Some((u, v)) = frag.bond_endpoints(bond) else {
            continue;
        };
        for w in frag.atom_order().iter().copied() {
            let (du, dv) = (paths.dist[w.index()][u.index()], paths.dist[w.index()][v.index()]);
            if du == u32::MAX || dv == u32::MAX || du + dv + 1 < 3 {
                continue;
            }
            let (Some(to_u), Some(to_v)) = (paths.path(w, u), paths.path(w, v)) else {
                continue;
            };
            if to_u[1..].iter().any(|atom| to_v[1..].contains(atom)) {
                continue;
            }
            let mut cycle = to_u;
            cycle.extend(to_v[1..].iter().rev());
            candidates.push(normalize_cycle(cycle));
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

/// Rotate a cycle to start at its smallest atom, walking towards the smaller neighbour.
fn normalize_cycle(mut cycle: Vec<NodeIndex>) -> Vec<NodeIndex> {
    if let Some(min) = cycle.iter().enumerate().min_by_key(|(_, atom)| **atom).map(|(i, _)| i) {
        cycle.rotate_left(min);
    }
    let n = cycle.len();
    if n > 2 && cycle[1] > cycle[n - 1] {
        cycle[1..].reverse();
    }
    cycle
}

/// A GF(2) basis of cycles, each cycle stored as a bitset over bond indices.
struct CycleBasis {
    words: usize,
    rows: Vec<Vec<u64>>,
}

impl CycleBasis {
    fn new(bond_count: usize) -> Self {
        Self {
            words: bond_count.div_ceil(64).max(1),
            rows: Vec::new(),
        }
    }

    fn bitset(&self, frag: &Fragment, cycle: &[NodeIndex]) -> Vec<u64> {
        let mut bits = vec![0u64; self.words];
        for i in 0..cycle.len() {
            if let Some(bond) = frag.bond_between(cycle[i], cycle[(i + 1) % cycle.len()]) {
                bits[bond.index() / 64] |= 1u64 << (bond.index() % 64);
            }
        }
        bits
    }

    /// Add a cycle if it is independent of the cycles already in the basis.
    fn insert(&mut self, frag: &Fragment, cycle: &[NodeIndex]) -> bool {
        let mut bits = self.bitset(frag, cycle);
        for row in &self.rows {
            if let Some(pivot) = lowest_bit(row) {
                if bits[pivot / 64] & (1u64 << (pivot % 64)) != 0 {
                    bits.iter_mut().zip(row).for_each(|(a, b)| *a ^= b);
                }
            }
        }
        if lowest_bit(&bits).is_none() {
            return false;
        }
        self.rows.push(bits);
        true
    }
}

fn lowest_bit(bits: &[u64]) -> Option<usize> {
    bits.iter()
        .enumerate()
        .find(|(_, word)| **word != 0)
        .map(|(i, word)| i * 64 + word.trailing_zeros() as usize)
}

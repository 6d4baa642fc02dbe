use super::*;
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;
use tracing::{instrument, trace};

/// Angle of a grid offset, in degrees counter-clockwise from three o'clock.
fn angle(dx: i32, dy: i32) -> f64 {
    (dy as f64).atan2(dx as f64).to_degrees()
}

/// How far a sweep starting at twelve o'clock turns before it meets `angle`. A bearing
/// straight up is met last rather than first.
fn sweep(angle: f64, clockwise: bool) -> f64 {
    let turn = if clockwise { 90.0 - angle } else { angle - 90.0 };
    let turn = turn.rem_euclid(360.0);
    if turn < 1e-9 {
        360.0
    } else {
        turn
    }
}

/// The neighbour of `ring` met first when sweeping from twelve o'clock, and the bond
/// shared with it.
fn first_swept_neighbour(
    rings: &[Ring],
    positions: &[(i32, i32)],
    ring: RingId,
    clockwise: bool,
) -> Option<(RingId, petgraph::graph::EdgeIndex)> {
    let (x, y) = positions[ring];
    rings[ring]
        .neighbours()
        .iter()
        .map(|&(other, bond)| {
            let (ox, oy) = positions[other];
            (sweep(angle(ox - x, oy - y), clockwise), other, bond)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, other, bond)| (other, bond))
}

/// Walk the periphery of the ring system clockwise, as drawn with `orientation`.
///
/// The walk starts in the uppermost (then rightmost) ring that has an unfused bond, at
/// the bond shared with its first neighbour counter-clockwise from twelve o'clock. It
/// follows each ring's cyclic bonds until it meets a fusion bond, crosses into the
/// ring on the other side and carries on, and stops when it comes back to an atom it
/// has already emitted. The result starts at its first non-fusion atom.
#[instrument(skip_all, fields(quadrant = ?orientation.quadrant))]
pub fn peripheral_path(
    rings: &[Ring],
    grid: &Grid,
    orientation: &Orientation,
    fusion_atoms: &BTreeSet<NodeIndex>,
) -> Result<Vec<NodeIndex>, NumberingError> {
    let mut positions = Vec::with_capacity(rings.len());
    for ring in 0..rings.len() {
        let cell = grid
            .position(ring)
            .ok_or_else(|| NumberingError::invariant(format!("ring {} was not placed", ring)))?;
        positions.push(orientation.transform(cell));
    }

    let mut start = (0..rings.len())
        .max_by_key(|&ring| (positions[ring].1, positions[ring].0))
        .ok_or_else(|| NumberingError::invariant("no rings to walk"))?;
    let mut moves = 0;
    while rings[start].fused_bond_count() == rings[start].size() {
        moves += 1;
        if moves > rings.len() {
            return Err(NumberingError::invariant("no ring with an unfused bond to start from"));
        }
        start = first_swept_neighbour(rings, &positions, start, true)
            .map(|(next, _)| next)
            .ok_or_else(|| NumberingError::invariant("fully fused ring without neighbours"))?;
    }

    let (_, entry) = first_swept_neighbour(rings, &positions, start, false)
        .ok_or_else(|| NumberingError::invariant("starting ring has no fused neighbour"))?;

    let forward = orientation.quadrant.is_mirrored();
    let step = |k: usize, n: usize| if forward { (k + 1) % n } else { (k + n - 1) % n };
    let leading = |ring: &Ring, k: usize| {
        let n = ring.size();
        if forward {
            ring.cyclic_atoms()[(k + 1) % n]
        } else {
            ring.cyclic_atoms()[k]
        }
    };

    let mut ring = start;
    let mut k = rings[ring]
        .cyclic_position(entry)
        .ok_or_else(|| NumberingError::invariant("entry bond missing from the starting ring"))?;
    let mut pivot = leading(&rings[ring], k);
    let limit = 2 * rings.iter().map(|r| r.size()).sum::<usize>() + 2;

    let mut path = Vec::new();
    let mut seen = BTreeSet::new();
    for _ in 0..limit {
        let current = &rings[ring];
        k = step(k, current.size());
        let bond = current.cyclic_bonds()[k];

        if current.is_fused(bond) {
            let next = current
                .neighbour_via(bond)
                .ok_or_else(|| NumberingError::invariant("fusion bond without a second ring"))?;
            let j = rings[next]
                .cyclic_position(bond)
                .ok_or_else(|| NumberingError::invariant("fusion bond missing from its ring"))?;
            // Leaving `next` through bond j must start at the atom we are standing on
            if leading(&rings[next], j) != pivot {
                return Err(NumberingError::invariant(format!(
                    "rings {} and {} are walked in inconsistent senses",
                    ring, next
                )));
            }
            trace!("crossing from ring {} into ring {}", ring, next);
            ring = next;
            k = j;
            continue;
        }

        if !seen.insert(pivot) {
            if let Some(first) = path.iter().position(|a| !fusion_atoms.contains(a)) {
                path.rotate_left(first);
            }
            return Ok(path);
        }
        path.push(pivot);
        pivot = leading(current, k);
    }

    Err(NumberingError::invariant("peripheral walk did not close"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    /// Each candidate periphery of a ring system, with the fusion atoms.
    fn peripheries(frag: &Fragment) -> (Vec<Vec<NodeIndex>>, BTreeSet<NodeIndex>) {
        let mut rings = ring_system(frag);
        let fusion = fusion_atoms(frag, &rings);
        let (start, bond) = choose_start(&rings).unwrap();
        orient_rings(frag, &mut rings, start, bond).unwrap();
        let tables = least_distorted(search_orientations(&rings, start, bond).unwrap());
        let (_, axes) = longest_chains(&tables);
        let grids = project_all(&tables, &axes, start).unwrap();
        let paths = preferred_orientations(&grids)
            .iter()
            .map(|o| peripheral_path(&rings, &grids[o.grid], o, &fusion).unwrap())
            .collect();
        (paths, fusion)
    }

    #[test]
    fn test_sweep() {
        assert_eq!(sweep(180.0, false), 90.0);
        assert_eq!(sweep(0.0, false), 270.0);
        assert_eq!(sweep(0.0, true), 90.0);
        assert_eq!(sweep(90.0, true), 360.0);
    }

    #[test]
    fn test_naphthalene_periphery() {
        init_logging("trace");
        let frag = parse_smiles(NAPHTHALENE).unwrap();
        let (paths, fusion) = peripheries(&frag);
        assert_eq!(paths.len(), 4);
        for path in &paths {
            println!("{:?}", path);
            assert_eq!(path.len(), 10);
            assert!(!fusion.contains(&path[0]));
            // Four atoms, a fusion atom, four atoms, a fusion atom
            assert!(fusion.contains(&path[4]) && fusion.contains(&path[9]));
            for i in 0..path.len() {
                let next = path[(i + 1) % path.len()];
                assert!(frag.bond_between(path[i], next).is_some());
            }
        }
    }

    #[test]
    fn test_pyrene_periphery_skips_interior() {
        let frag = parse_smiles(PYRENE).unwrap();
        let (paths, fusion) = peripheries(&frag);
        assert!(!paths.is_empty());
        for path in &paths {
            assert_eq!(path.len(), 14);
            assert_eq!(path.iter().filter(|a| fusion.contains(a)).count(), 4);
        }
    }
}

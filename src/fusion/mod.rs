use crate::*;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info, instrument};

mod direction;
pub use direction::*;

mod shape;
pub use shape::*;

mod table;
pub use table::*;

mod grid;
pub use grid::*;

mod quadrant;
pub use quadrant::*;

mod periphery;
pub use periphery::*;

mod ranking;
pub use ranking::*;

/// Ring atoms taking part in three or more ring bonds: the fusion (bridgehead) atoms.
pub fn fusion_atoms(frag: &Fragment, rings: &[Ring]) -> BTreeSet<NodeIndex> {
    rings
        .iter()
        .flat_map(|r| r.atoms().iter().copied())
        .filter(|&atom| ring_bond_count(frag, rings, atom) >= 3)
        .collect()
}

/// Can the numbering rules be applied to these rings at all?
///
/// Single rings have no fused numbering, and large rings carrying several fusions
/// can't be drawn with the fixed ring shapes.
pub fn is_numberable(rings: &[Ring]) -> bool {
    rings.len() >= 2
        && !rings
            .iter()
            .any(|r| r.size() > 8 && r.fused_bond_count() > 2)
}

/// Are all rings reachable from one another through fusion bonds?
fn is_single_system(rings: &[Ring]) -> bool {
    let mut reached = vec![false; rings.len()];
    let mut queue = VecDeque::from([0]);
    reached[0] = true;
    while let Some(ring) = queue.pop_front() {
        for &(next, _) in rings[ring].neighbours() {
            if !reached[next] {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }
    reached.into_iter().all(|r| r)
}

/// Number a fused ring system following the IUPAC fused ring rules.
///
/// On success every ring atom carries exactly one locant (`1`, `2`, ..., with fusion
/// carbons lettered after the preceding number, e.g. `4a`), the fragment's atoms are
/// reordered to follow the numbering, and the atom numbered `1` becomes the default
/// attachment atom. Ring systems the rules don't apply to (fewer than two rings, or a
/// ring of more than eight atoms with more than two fusions) are left with no locants
/// at all, which is not an error.
#[instrument(skip_all, fields(atoms = frag.atom_count()))]
pub fn number_fused_ring(frag: &mut Fragment) -> Result<(), NumberingError> {
    let mut rings = smallest_rings(frag);
    link_fused_neighbours(&mut rings)?;
    if !is_numberable(&rings) {
        debug!("{} rings, not numbering", rings.len());
        frag.clear_locants();
        return Ok(());
    }
    if !is_single_system(&rings) {
        return Err(NumberingError::unsupported(
            "rings are not all fused into a single system",
        ));
    }

    let fusion = fusion_atoms(frag, &rings);
    let (start, start_bond) = choose_start(&rings)?;
    orient_rings(frag, &mut rings, start, start_bond)?;

    let tables = least_distorted(search_orientations(&rings, start, start_bond)?);
    let (length, axes) = longest_chains(&tables);
    debug!("drawing the {} ring chain horizontally", length);
    let grids = project_all(&tables, &axes, start)?;

    let mut candidates: Vec<Vec<NodeIndex>> = Vec::new();
    for orientation in preferred_orientations(&grids) {
        let path = peripheral_path(&rings, &grids[orientation.grid], &orientation, &fusion)?;
        let path = complete_path(frag, &rings, path);
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }

    let ring_atoms: BTreeSet<NodeIndex> = rings
        .iter()
        .flat_map(|r| r.atoms().iter().copied())
        .collect();
    if let Some(bad) = candidates.iter().find(|p| p.len() != ring_atoms.len()) {
        return Err(NumberingError::invariant(format!(
            "numbering covers {} atoms of a {} atom ring system",
            bad.len(),
            ring_atoms.len()
        )));
    }

    let best = Ranker::new(frag, &fusion)
        .best(candidates)
        .ok_or_else(|| NumberingError::invariant("no candidate numbering"))?;
    commit_numbering(frag, &best, &fusion)?;
    info!(
        "numbered {} rings: {}",
        rings.len(),
        best.iter()
            .filter_map(|&a| frag.atom(a).first_locant())
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(())
}

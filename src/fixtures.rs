//! Builders for the fused ring systems used throughout the tests.

use crate::*;
use petgraph::graph::NodeIndex;

pub const NAPHTHALENE: &str = "c1ccc2ccccc2c1";
pub const QUINOLINE: &str = "n1cccc2ccccc12";
pub const ISOQUINOLINE: &str = "c1nccc2ccccc12";
pub const ANTHRACENE: &str = "c1ccc2cc3ccccc3cc2c1";
pub const PHENANTHRENE: &str = "c1ccc2c(c1)ccc1ccccc12";
pub const PYRENE: &str = "c1cc2ccc3cccc4ccc(c1)c2c34";
pub const INDENE: &str = "C1C=Cc2ccccc12";
pub const FLUORENE: &str = "C1c2ccccc2-c2ccccc12";
pub const INDOLIZINE: &str = "c1ccn2cccc2c1";
pub const AZULENE: &str = "c1ccc2cccc2cc1";

fn add_ring_atom(frag: &mut Fragment) -> NodeIndex {
    frag.add_atom(Atom::aromatic(Element::C))
}

/// A chain of ortho-fused benzene rings.
///
/// Every ring after the second is fused onto the previous one at the given cyclic
/// distance from the bond that ring was fused through: 3 continues straight on, 2 and
/// 4 turn one way or the other. `&[]` is naphthalene, `&[3]` anthracene, `&[2]`
/// phenanthrene, and a run of 2s winds into a helicene.
pub fn hexagon_chain(turns: &[usize]) -> Fragment {
    let mut frag = Fragment::new();
    let mut ring: Vec<NodeIndex> = (0..6).map(|_| add_ring_atom(&mut frag)).collect();
    for i in 0..6 {
        frag.add_bond(ring[i], ring[(i + 1) % 6], Bond::Aromatic);
    }

    let mut exit = 3;
    for step in 0..=turns.len() {
        let (a, b) = (ring[exit], ring[exit + 1]);
        let mut next = vec![b, a];
        let mut previous = a;
        for _ in 0..4 {
            let atom = add_ring_atom(&mut frag);
            frag.add_bond(previous, atom, Bond::Aromatic);
            next.push(atom);
            previous = atom;
        }
        frag.add_bond(previous, b, Bond::Aromatic);
        ring = next;
        if let Some(&turn) = turns.get(step) {
            exit = turn;
        }
    }
    frag
}

/// A nine membered carbocycle with benzene rings fused on three of its bonds.
pub fn benzo_fused_nonagon() -> Fragment {
    let mut frag = Fragment::new();
    let ring: Vec<NodeIndex> = (0..9).map(|_| frag.add_atom(Atom::new(Element::C))).collect();
    for i in 0..9 {
        frag.add_bond(ring[i], ring[(i + 1) % 9], Bond::Single);
    }
    for start in [0, 3, 6] {
        let (a, b) = (ring[start], ring[start + 1]);
        let mut previous = a;
        for _ in 0..4 {
            let atom = add_ring_atom(&mut frag);
            frag.add_bond(previous, atom, Bond::Aromatic);
            previous = atom;
        }
        frag.add_bond(previous, b, Bond::Aromatic);
    }
    frag
}

/// Perceive and link the rings of a fragment.
pub fn ring_system(frag: &Fragment) -> Vec<Ring> {
    let mut rings = smallest_rings(frag);
    link_fused_neighbours(&mut rings).unwrap();
    rings
}

/// The preferred locants of the fragment's atoms, in canonical order.
pub fn locant_list(frag: &Fragment) -> Vec<String> {
    frag.locants()
        .into_iter()
        .map(|l| l.unwrap_or_default())
        .collect()
}

/// Element symbol of the atom carrying `locant`.
pub fn element_at(frag: &Fragment, locant: &str) -> Option<Element> {
    frag.atom_by_locant(locant).map(|node| frag.atom(node).element)
}

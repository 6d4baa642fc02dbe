use super::*;
use lazy_static::lazy_static;
use petgraph::graph::NodeIndex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

lazy_static! {
    /// Seniority of ring heteroatoms when choosing between numberings, highest first.
    static ref HETEROATOM_PRIORITY: BTreeMap<Element, u8> = {
        use Element::*;
        [O, S, Se, Te, N, P, As, Sb, Bi, Si, Ge, Sn, Pb, B, Hg]
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &element)| (element, i as u8 + 1))
            .collect()
    };
}

/// Seniority of an element as a ring heteroatom. Carbon and unlisted elements are 0.
pub fn heteroatom_priority(element: Element) -> u8 {
    HETEROATOM_PRIORITY.get(&element).copied().unwrap_or(0)
}

/// A ranking stage. `Ordering::Less` means the first path is the better numbering.
type Stage = fn(&Ranker, &[NodeIndex], &[NodeIndex]) -> Ordering;

/// Compares candidate numberings of one ring system.
pub struct Ranker<'a> {
    frag: &'a Fragment,
    fusion_atoms: &'a BTreeSet<NodeIndex>,
    positions: Vec<usize>,
}

/// The stages in the order they are applied; later stages only break ties.
const STAGES: [(&str, Stage); 5] = [
    ("heteroatoms", by_heteroatoms),
    ("heteroatom seniority", by_seniority),
    ("fusion carbons", by_fusion_carbons),
    ("fusion atoms", by_fusion_atoms),
    ("fragment order", by_fragment_order),
];

impl<'a> Ranker<'a> {
    pub fn new(frag: &'a Fragment, fusion_atoms: &'a BTreeSet<NodeIndex>) -> Self {
        Self {
            frag,
            fusion_atoms,
            positions: frag.order_positions(),
        }
    }

    fn is_fusion_carbon(&self, atom: NodeIndex) -> bool {
        self.fusion_atoms.contains(&atom) && self.frag.atom(atom).element.is_carbon()
    }

    fn is_heteroatom(&self, atom: NodeIndex) -> bool {
        !self.frag.atom(atom).element.is_carbon()
    }

    /// The atoms that receive plain numbers, i.e. all but the fusion carbons.
    fn numbered<'p>(&'p self, path: &'p [NodeIndex]) -> impl Iterator<Item = NodeIndex> + 'p {
        path.iter().copied().filter(move |&a| !self.is_fusion_carbon(a))
    }

    /// Position by position, the first path to have `wanted` where the other does not wins.
    fn earliest<I>(a: I, b: I, wanted: impl Fn(NodeIndex) -> bool) -> Ordering
    where
        I: Iterator<Item = NodeIndex>,
    {
        for (x, y) in a.zip(b) {
            match (wanted(x), wanted(y)) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
        Ordering::Equal
    }

    pub fn compare(&self, a: &[NodeIndex], b: &[NodeIndex]) -> Ordering {
        for (name, stage) in STAGES.iter() {
            let ordering = stage(self, a, b);
            if ordering != Ordering::Equal {
                trace!("decided by {}", name);
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// The best of the candidate numberings.
    pub fn best(&self, candidates: Vec<Vec<NodeIndex>>) -> Option<Vec<NodeIndex>> {
        debug!("ranking {} candidate numberings", candidates.len());
        candidates.into_iter().min_by(|a, b| self.compare(a, b))
    }
}

/// Low locants to heteroatoms considered together.
fn by_heteroatoms(ranker: &Ranker, a: &[NodeIndex], b: &[NodeIndex]) -> Ordering {
    Ranker::earliest(ranker.numbered(a), ranker.numbered(b), |x| ranker.is_heteroatom(x))
}

/// Low locants to the senior heteroatoms.
fn by_seniority(ranker: &Ranker, a: &[NodeIndex], b: &[NodeIndex]) -> Ordering {
    for (x, y) in ranker.numbered(a).zip(ranker.numbered(b)) {
        let (px, py) = (
            heteroatom_priority(ranker.frag.atom(x).element),
            heteroatom_priority(ranker.frag.atom(y).element),
        );
        if px != py {
            return py.cmp(&px);
        }
    }
    Ordering::Equal
}

/// Low locants to fusion carbon atoms.
fn by_fusion_carbons(ranker: &Ranker, a: &[NodeIndex], b: &[NodeIndex]) -> Ordering {
    Ranker::earliest(a.iter().copied(), b.iter().copied(), |x| ranker.is_fusion_carbon(x))
}

/// Low locants to fusion atoms of any element.
fn by_fusion_atoms(ranker: &Ranker, a: &[NodeIndex], b: &[NodeIndex]) -> Ordering {
    Ranker::earliest(a.iter().copied(), b.iter().copied(), |x| {
        ranker.fusion_atoms.contains(&x)
    })
}

/// Otherwise, stay as close as possible to the fragment's current order.
fn by_fragment_order(ranker: &Ranker, a: &[NodeIndex], b: &[NodeIndex]) -> Ordering {
    let position = |x: &NodeIndex| ranker.positions.get(x.index()).copied().unwrap_or(usize::MAX);
    a.iter().map(position).cmp(b.iter().map(position))
}

/// Append the ring atoms a periphery walk never reached, in fragment order.
pub fn complete_path(frag: &Fragment, rings: &[Ring], mut path: Vec<NodeIndex>) -> Vec<NodeIndex> {
    let on_path: BTreeSet<NodeIndex> = path.iter().copied().collect();
    for &atom in frag.atom_order() {
        if !on_path.contains(&atom) && rings.iter().any(|r| r.contains_atom(atom)) {
            path.push(atom);
        }
    }
    path
}

/// Write the locants of a numbering onto the fragment.
///
/// Every atom gets the next number, except fusion carbons, which take the previous
/// number and the next letter (`4a`, `4b`, ...). Running out of letters after one
/// number is an invariant violation.
pub fn assign_locants(
    frag: &mut Fragment,
    path: &[NodeIndex],
    fusion_atoms: &BTreeSet<NodeIndex>,
) -> Result<(), NumberingError> {
    frag.clear_locants();
    let mut number = 0;
    let mut letter: Option<char> = None;
    for &atom in path {
        let locant = if fusion_atoms.contains(&atom) && frag.atom(atom).element.is_carbon() {
            let next = match letter {
                Some('z') => {
                    return Err(NumberingError::invariant(format!(
                        "more than 26 lettered locants after {}",
                        number
                    )))
                }
                Some(l) => (l as u8 + 1) as char,
                None => 'a',
            };
            letter = Some(next);
            Locant::lettered(number, next)
        } else {
            number += 1;
            letter = None;
            Locant::numeric(number)
        };
        frag.atom_mut(atom).add_locant(locant.to_string());
    }
    Ok(())
}

/// Make the numbering permanent: locants, atom order and default attachment atom.
pub fn commit_numbering(
    frag: &mut Fragment,
    path: &[NodeIndex],
    fusion_atoms: &BTreeSet<NodeIndex>,
) -> Result<(), NumberingError> {
    assign_locants(frag, path, fusion_atoms)?;

    let on_path: BTreeSet<NodeIndex> = path.iter().copied().collect();
    let mut order = path.to_vec();
    order.extend(frag.atom_order().iter().copied().filter(|a| !on_path.contains(a)));
    frag.reorder_atoms(order)?;

    if let Some(&first) = path.first() {
        frag.set_default_in_atom(first);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_heteroatom_priorities() {
        assert_eq!(heteroatom_priority(Element::O), 15);
        assert_eq!(heteroatom_priority(Element::Hg), 1);
        assert_eq!(heteroatom_priority(Element::C), 0);
        assert_eq!(heteroatom_priority(Element::Cl), 0);
        assert!(heteroatom_priority(Element::S) > heteroatom_priority(Element::Se));
        assert!(heteroatom_priority(Element::N) > heteroatom_priority(Element::P));
        assert!(heteroatom_priority(Element::Bi) > heteroatom_priority(Element::Si));
    }

    /// Naphthalene with a nitrogen in place of one carbon, its atoms and fusion atoms.
    fn azanaphthalene(smiles: &str) -> (Fragment, Vec<NodeIndex>, BTreeSet<NodeIndex>) {
        let frag = parse_smiles(smiles).unwrap();
        let rings = ring_system(&frag);
        let fusion = fusion_atoms(&frag, &rings);
        let atoms = frag.atom_order().to_vec();
        (frag, atoms, fusion)
    }

    #[test]
    fn test_heteroatom_stage() {
        let (frag, atoms, fusion) = azanaphthalene(QUINOLINE);
        let ranker = Ranker::new(&frag, &fusion);
        // Nitrogen first beats nitrogen second
        let mut swapped = atoms.clone();
        swapped.swap(0, 1);
        assert_eq!(by_heteroatoms(&ranker, &atoms, &swapped), Ordering::Less);
        assert_eq!(ranker.compare(&swapped, &atoms), Ordering::Greater);
        // A fusion carbon in between does not count as a position
        let fusion_carbon = *fusion.iter().next().unwrap();
        let mut shifted: Vec<NodeIndex> = vec![fusion_carbon];
        shifted.extend(atoms.iter().copied().filter(|&a| a != fusion_carbon));
        assert_eq!(by_heteroatoms(&ranker, &atoms, &shifted), Ordering::Equal);
    }

    #[test]
    fn test_seniority_stage() {
        // Oxygen outranks nitrogen once both heteroatoms are equally placed
        let frag = parse_smiles("c1ocnc1").unwrap();
        let fusion = BTreeSet::new();
        let ranker = Ranker::new(&frag, &fusion);
        let order = frag.atom_order();
        let oxygen_first = vec![order[1], order[0], order[3], order[2], order[4]];
        let nitrogen_first = vec![order[3], order[2], order[1], order[0], order[4]];
        assert_eq!(by_heteroatoms(&ranker, &oxygen_first, &nitrogen_first), Ordering::Equal);
        assert_eq!(ranker.compare(&oxygen_first, &nitrogen_first), Ordering::Less);
    }

    #[test]
    fn test_fusion_and_order_stages() {
        let frag = parse_smiles(INDOLIZINE).unwrap();
        let rings = ring_system(&frag);
        let fusion = fusion_atoms(&frag, &rings);
        let ranker = Ranker::new(&frag, &fusion);
        let order = frag.atom_order().to_vec();
        let nitrogen = order[3];
        assert!(fusion.contains(&nitrogen));
        assert!(!ranker.is_fusion_carbon(nitrogen));

        let mut early = order.clone();
        early.retain(|&a| a != nitrogen);
        early.insert(1, nitrogen);
        assert_eq!(by_fusion_atoms(&ranker, &early, &order), Ordering::Less);
        assert_eq!(by_fragment_order(&ranker, &order, &early), Ordering::Less);
        assert_eq!(ranker.compare(&order, &order), Ordering::Equal);
    }

    #[test]
    fn test_assign_locants() {
        let mut frag = parse_smiles(NAPHTHALENE).unwrap();
        let rings = ring_system(&frag);
        let fusion = fusion_atoms(&frag, &rings);
        // c1ccc2ccccc2c1: atoms 3 and 8 are the fusion carbons
        let order = frag.atom_order().to_vec();
        let path = vec![
            order[0], order[1], order[2], order[3], order[4], order[5], order[6], order[7],
            order[8], order[9],
        ];
        assign_locants(&mut frag, &path, &fusion).unwrap();
        assert_eq!(
            locant_list(&frag),
            vec!["1", "2", "3", "3a", "4", "5", "6", "7", "7a", "8"]
        );
        commit_numbering(&mut frag, &path, &fusion).unwrap();
        assert_eq!(frag.default_in_atom(), Some(order[0]));
    }

    #[test]
    fn test_letters_run_out_after_z() {
        let mut frag = Fragment::new();
        let atoms: Vec<NodeIndex> = (0..28).map(|_| frag.add_atom(Atom::new(Element::C))).collect();
        let mut fusion: BTreeSet<NodeIndex> = atoms[1..27].iter().copied().collect();

        assign_locants(&mut frag, &atoms[..27], &fusion).unwrap();
        assert_eq!(frag.atom(atoms[26]).first_locant(), Some("1z"));

        fusion.insert(atoms[27]);
        let err = assign_locants(&mut frag, &atoms, &fusion).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_complete_path_appends_interior() {
        let frag = parse_smiles(PYRENE).unwrap();
        let rings = ring_system(&frag);
        let order = frag.atom_order();
        let periphery: Vec<NodeIndex> = order.iter().copied().filter(|a| a.index() < 14).collect();
        let full = complete_path(&frag, &rings, periphery);
        assert_eq!(full.len(), 16);
        assert_eq!(&full[14..], &[order[14], order[15]]);
    }
}

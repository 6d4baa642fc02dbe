use super::*;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::BTreeSet;

/// An atom of a fragment, along with the locants it is currently known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    locants: Vec<String>,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            aromatic: false,
            locants: Vec::new(),
        }
    }

    pub fn aromatic(element: Element) -> Self {
        Self {
            element,
            aromatic: true,
            locants: Vec::new(),
        }
    }

    pub fn locants(&self) -> &[String] {
        &self.locants
    }

    /// The first (preferred) locant of this atom, if it has any.
    pub fn first_locant(&self) -> Option<&str> {
        self.locants.first().map(|l| l.as_str())
    }

    pub fn has_locant(&self, locant: &str) -> bool {
        self.locants.iter().any(|l| l == locant)
    }

    /// Add a locant, keeping the set free of duplicates.
    pub fn add_locant(&mut self, locant: impl Into<String>) {
        let locant = locant.into();
        if !self.has_locant(&locant) {
            self.locants.push(locant);
        }
    }

    pub fn clear_locants(&mut self) {
        self.locants.clear();
    }
}

/// A connected piece of a molecule under construction.
///
/// The fragment owns its atoms and bonds in a petgraph graph, and separately keeps
/// the canonical iteration order of its atoms. Numbering a ring system rewrites
/// that order, so code that walks "the atoms of the fragment" should go through
/// [`Fragment::atom_order`] rather than the graph's node indices.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    graph: MoleculeGraph,
    order: Vec<NodeIndex>,
    default_in_atom: Option<NodeIndex>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        let node = self.graph.add_node(atom);
        self.order.push(node);
        node
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        self.graph.update_edge(a, b, bond)
    }

    pub fn graph(&self) -> &MoleculeGraph {
        &self.graph
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_total(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atom(&self, node: NodeIndex) -> &Atom {
        &self.graph[node]
    }

    pub fn atom_mut(&mut self, node: NodeIndex) -> &mut Atom {
        &mut self.graph[node]
    }

    /// The atoms of the fragment in canonical order.
    pub fn atom_order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Number of bonds the atom takes part in within this fragment.
    pub fn bond_count(&self, node: NodeIndex) -> usize {
        self.graph.edges(node).count()
    }

    pub fn neighbours(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bonds_of(&self, node: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(node).map(|e| e.id())
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, bond: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(bond)
    }

    pub fn bond(&self, bond: EdgeIndex) -> Option<Bond> {
        self.graph.edge_weight(bond).copied()
    }

    /// Find the atom carrying the given locant, e.g. `"4a"`.
    pub fn atom_by_locant(&self, locant: &str) -> Option<NodeIndex> {
        self.order
            .iter()
            .copied()
            .find(|&node| self.graph[node].has_locant(locant))
    }

    /// The preferred locant of every atom, in canonical order. Atoms without a
    /// locant show up as `None`.
    pub fn locants(&self) -> Vec<Option<String>> {
        self.order
            .iter()
            .map(|&node| self.graph[node].first_locant().map(str::to_string))
            .collect()
    }

    pub fn clear_locants(&mut self) {
        for node in self.graph.node_indices() {
            self.graph[node].clear_locants();
        }
    }

    pub fn default_in_atom(&self) -> Option<NodeIndex> {
        self.default_in_atom
    }

    pub fn set_default_in_atom(&mut self, atom: NodeIndex) {
        self.default_in_atom = Some(atom);
    }

    /// Replace the canonical atom order. `new_order` must be a permutation of the
    /// fragment's atoms.
    pub fn reorder_atoms(&mut self, new_order: Vec<NodeIndex>) -> Result<(), NumberingError> {
        if new_order.len() != self.order.len() {
            return Err(NumberingError::invariant(format!(
                "reordering has {} atoms but the fragment has {}",
                new_order.len(),
                self.order.len()
            )));
        }
        let distinct: BTreeSet<NodeIndex> = new_order.iter().copied().collect();
        if distinct.len() != new_order.len()
            || distinct.iter().any(|n| n.index() >= self.graph.node_count())
        {
            return Err(NumberingError::invariant(
                "reordering is not a permutation of the fragment's atoms",
            ));
        }
        self.order = new_order;
        Ok(())
    }

    /// Position of every atom in the canonical order, indexed by node index.
    pub(crate) fn order_positions(&self) -> Vec<usize> {
        let mut positions = vec![usize::MAX; self.graph.node_count()];
        for (i, node) in self.order.iter().enumerate() {
            positions[node.index()] = i;
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethane() -> (Fragment, NodeIndex, NodeIndex) {
        let mut frag = Fragment::new();
        let a = frag.add_atom(Atom::new(Element::C));
        let b = frag.add_atom(Atom::new(Element::C));
        frag.add_bond(a, b, Bond::Single);
        (frag, a, b)
    }

    #[test]
    fn test_locants() {
        let (mut frag, a, b) = ethane();
        frag.atom_mut(a).add_locant("1");
        frag.atom_mut(a).add_locant("1");
        frag.atom_mut(b).add_locant("2");
        assert_eq!(frag.atom(a).locants(), &["1".to_string()]);
        assert_eq!(frag.atom_by_locant("2"), Some(b));
        assert_eq!(frag.atom_by_locant("3"), None);

        frag.clear_locants();
        assert_eq!(frag.locants(), vec![None, None]);
    }

    #[test]
    fn test_reorder() {
        let (mut frag, a, b) = ethane();
        frag.reorder_atoms(vec![b, a]).unwrap();
        assert_eq!(frag.atom_order(), &[b, a]);

        assert!(frag.reorder_atoms(vec![b, b]).unwrap_err().is_internal());
        assert!(frag.reorder_atoms(vec![a]).unwrap_err().is_internal());
        assert_eq!(frag.atom_order(), &[b, a]);
    }

    #[test]
    fn test_bond_count() {
        let (mut frag, a, b) = ethane();
        let c = frag.add_atom(Atom::new(Element::O));
        frag.add_bond(a, c, Bond::Single);
        assert_eq!(frag.bond_count(a), 2);
        assert_eq!(frag.bond_count(b), 1);
        assert_eq!(frag.bond_total(), 2);
    }
}

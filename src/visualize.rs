use crate::{Bond, Element, Fragment};
use petgraph::prelude::EdgeRef;
use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Render a fragment as an undirected Graphviz graph.
///
/// Nodes are labelled with their element and, once numbered, their locant (`N\n1`).
/// Nodes appear in the fragment's atom order, so a numbered fragment lists its ring
/// atoms in numbering order.
pub fn fragment_to_dot(frag: &Fragment) -> String {
    let mut dot = String::new();
    // Writing into a String can't fail
    let _ = writeln!(dot, "graph Fragment {{");
    let _ = writeln!(dot, "    layout=neato;");
    let _ = writeln!(dot, "    multiedge=true;");

    for &node in frag.atom_order() {
        let atom = frag.atom(node);
        let label = match atom.first_locant() {
            Some(locant) => format!("{}\\n{}", atom.element, locant),
            None => atom.element.to_string(),
        };
        let _ = writeln!(
            dot,
            "    {} [label=\"{}\", fontcolor=white, shape=circle, style=filled, fillcolor={}];",
            node.index(),
            label,
            element_color(atom.element)
        );
    }

    for edge in frag.graph().edge_references() {
        let (style, extra) = bond_style(edge.weight());
        for _ in 0..edge.weight().order() {
            let _ = writeln!(
                dot,
                "    {} -- {} [style={}, penwidth=2.0{}];",
                edge.source().index(),
                edge.target().index(),
                style,
                extra
            );
        }
    }

    let _ = writeln!(dot, "}}");
    dot
}

/// Write the DOT rendering of a fragment to `path`.
pub fn write_dot(frag: &Fragment, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)?;
    file.write_all(fragment_to_dot(frag).as_bytes())?;
    info!("DOT file saved to {}", path.display());
    Ok(())
}

fn element_color(element: Element) -> &'static str {
    use Element::*;
    match element {
        C => "black",
        H => "gray",
        O => "red",
        N => "blue",
        S => "gold",
        Se | Te => "orange",
        P | As | Sb | Bi => "darkorange",
        F | Cl | Br | I => "darkgreen",
        B | Al | Ga | In | Tl => "pink",
        Si | Ge | Sn | Pb => "slategray",
        Hg => "purple",
    }
}

fn bond_style(bond: &Bond) -> (&'static str, &'static str) {
    match bond {
        Bond::Aromatic => ("dashed", ", color=purple"),
        Bond::Single | Bond::Double | Bond::Triple => ("solid", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    #[test]
    fn test_dot_of_unnumbered_fragment() {
        let frag = parse_smiles("CC=O").unwrap();
        let dot = fragment_to_dot(&frag);
        println!("{}", dot);
        assert!(dot.starts_with("graph Fragment {"));
        assert!(dot.contains("2 [label=\"O\""));
        assert!(dot.contains("fillcolor=red"));
        // A double bond is drawn twice
        assert_eq!(dot.matches("1 -- 2").count(), 2);
        assert_eq!(dot.matches(" -- ").count(), 3);
    }

    #[test]
    fn test_dot_shows_locants() {
        init_logging("trace");
        let mut frag = parse_smiles("n1cccc2ccccc12").unwrap();
        number_fused_ring(&mut frag).unwrap();
        let dot = fragment_to_dot(&frag);
        assert!(dot.contains("label=\"N\\n1\""));
        assert!(dot.contains("label=\"C\\n8a\""));
        assert!(dot.contains("style=dashed"));

        let path = std::env::temp_dir().join("fused-numbering-quinoline.dot");
        write_dot(&frag, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), dot);
    }
}

use crate::*;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use tracing::trace;

/// Parses a SMILES string into a heavy-atom `Fragment`.
///
/// This reader exists to feed ring systems to the numbering engine, so it keeps
/// only what the engine looks at: elements, aromaticity and connectivity.
/// Hydrogen counts, charges, isotopes and stereo markers are read and dropped.
///
/// # Arguments
///
/// * `smiles` - The SMILES string to parse.
///
/// # Returns
///
/// * `Result<Fragment, SmilesError>` - The fragment, atoms in input order.
pub fn parse_smiles(smiles: &str) -> Result<Fragment, SmilesError> {
    let mut frag = Fragment::new();
    let mut current_atom: Option<NodeIndex> = None;
    let mut bond_type: Option<Bond> = None;
    let mut branch_stack: Vec<NodeIndex> = Vec::new();
    let mut ring_map: BTreeMap<u32, (NodeIndex, Option<Bond>)> = BTreeMap::new();

    let chars: Vec<char> = smiles.trim().chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => {
                // Start of a branch: remember where to come back to
                let atom = current_atom.ok_or(SmilesError::BranchNoCurrentAtom(i))?;
                branch_stack.push(atom);
                i += 1;
            }
            ')' => {
                current_atom = Some(branch_stack.pop().ok_or(SmilesError::BranchEndNoStart(i))?);
                i += 1;
            }
            '-' | '=' | '#' | ':' => {
                bond_type = Some(match c {
                    '-' => Bond::Single,
                    '=' => Bond::Double,
                    '#' => Bond::Triple,
                    _ => Bond::Aromatic,
                });
                i += 1;
            }
            '%' | '0'..='9' => {
                // Ring closure, either a single digit or '%' and two digits
                let (label, width) = if c == '%' {
                    let digits: String = chars.iter().skip(i + 1).take(2).collect();
                    let label = digits
                        .parse::<u32>()
                        .ok()
                        .filter(|_| digits.len() == 2)
                        .ok_or(SmilesError::UnexpectedCharacter(c, i))?;
                    (label, 3)
                } else {
                    (c.to_digit(10).unwrap_or_default(), 1)
                };
                let current = current_atom
                    .ok_or_else(|| SmilesError::RingClosureNoCurrentAtom(label.to_string(), i))?;
                if let Some((start_atom, opening_bond)) = ring_map.remove(&label) {
                    let bond = bond_type
                        .take()
                        .or(opening_bond)
                        .unwrap_or_else(|| implicit_bond(&frag, start_atom, current));
                    frag.add_bond(start_atom, current, bond);
                    trace!("closed ring {} between {:?} and {:?}", label, start_atom, current);
                } else {
                    ring_map.insert(label, (current, bond_type.take()));
                }
                i += width;
            }
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&x| x == ']')
                    .map(|offset| i + offset)
                    .ok_or(SmilesError::UnclosedBracket(i))?;
                let content: String = chars[i + 1..end].iter().collect();
                let atom = parse_bracket_atom(&content)?;
                current_atom = Some(add_chain_atom(&mut frag, atom, current_atom, bond_type.take()));
                i = end + 1;
            }
            '@' | '/' | '\\' => {
                // Stereo markers are irrelevant to numbering
                i += 1;
            }
            '.' => {
                // The next atom starts a disconnected component
                current_atom = None;
                i += 1;
            }
            _ if c.is_ascii_alphabetic() => {
                let (atom, width) = parse_organic_atom(&chars[i..])
                    .ok_or(SmilesError::UnexpectedCharacter(c, i))?;
                current_atom = Some(add_chain_atom(&mut frag, atom, current_atom, bond_type.take()));
                i += width;
            }
            _ => return Err(SmilesError::UnexpectedCharacter(c, i)),
        }
    }

    if let Some(bond) = bond_type {
        let symbol = match bond {
            Bond::Single => '-',
            Bond::Double => '=',
            Bond::Triple => '#',
            Bond::Aromatic => ':',
        };
        return Err(SmilesError::DanglingBond(symbol, chars.len().saturating_sub(1)));
    }
    if !branch_stack.is_empty() {
        return Err(SmilesError::UnclosedBranch);
    }
    if !ring_map.is_empty() {
        return Err(SmilesError::UnclosedRings(ring_map.keys().copied().collect()));
    }

    Ok(frag)
}

/// The bond used when none is written: aromatic between two aromatic atoms,
/// single otherwise.
fn implicit_bond(frag: &Fragment, a: NodeIndex, b: NodeIndex) -> Bond {
    if frag.atom(a).aromatic && frag.atom(b).aromatic {
        Bond::Aromatic
    } else {
        Bond::Single
    }
}

fn add_chain_atom(
    frag: &mut Fragment,
    atom: Atom,
    previous: Option<NodeIndex>,
    bond: Option<Bond>,
) -> NodeIndex {
    let new_atom = frag.add_atom(atom);
    if let Some(prev) = previous {
        let bond = bond.unwrap_or_else(|| implicit_bond(frag, prev, new_atom));
        frag.add_bond(prev, new_atom, bond);
    }
    new_atom
}

/// Parse an atom of the organic subset at the start of `chars`.
/// Returns the atom and the number of characters it used.
fn parse_organic_atom(chars: &[char]) -> Option<(Atom, usize)> {
    let first = *chars.first()?;
    if first.is_ascii_uppercase() {
        // Two letter symbols of the organic subset
        if let Some(&second) = chars.get(1) {
            let candidate: String = [first, second].iter().collect();
            if candidate == "Cl" || candidate == "Br" {
                return Some((Atom::new(Element::from_symbol(&candidate)?), 2));
            }
        }
        let element = match first {
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => Element::from_symbol(&first.to_string())?,
            _ => return None,
        };
        Some((Atom::new(element), 1))
    } else {
        let element = match first {
            'b' => Element::B,
            'c' => Element::C,
            'n' => Element::N,
            'o' => Element::O,
            'p' => Element::P,
            's' => Element::S,
            _ => return None,
        };
        Some((Atom::aromatic(element), 1))
    }
}

/// Parse the inside of a bracket atom, e.g. `nH`, `Se`, `se`, `13CH3+`.
fn parse_bracket_atom(content: &str) -> Result<Atom, SmilesError> {
    // Skip the isotope
    let rest = content.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = rest.chars().peekable();
    let first = chars
        .next()
        .ok_or_else(|| SmilesError::UnknownElement(content.to_string()))?;

    let single = first.to_ascii_uppercase().to_string();
    let element = match chars.peek() {
        Some(&next) if next.is_ascii_lowercase() => {
            let candidate = format!("{}{}", single, next);
            Element::from_symbol(&candidate)
                .or_else(|| Element::from_symbol(&single))
                .ok_or(SmilesError::UnknownElement(candidate))?
        }
        _ => single.parse()?,
    };
    if first.is_ascii_lowercase() {
        Ok(Atom::aromatic(element))
    } else {
        Ok(Atom::new(element))
    }
}

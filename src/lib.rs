use petgraph::graph::UnGraph;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

mod error;
pub use error::*;

mod fragment;
pub use fragment::*;

mod locant;
pub use locant::*;

mod parse;
pub use parse::*;

mod rings;
pub use rings::*;

mod fusion;
pub use fusion::*;

mod visualize;
pub use visualize::*;

#[cfg(test)]
mod fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Al,
    Si,
    P,
    S,
    Cl,
    Ga,
    Ge,
    As,
    Se,
    Br,
    In,
    Sn,
    Sb,
    Te,
    I,
    Tl,
    Hg,
    Pb,
    Bi,
}

impl Element {
    /// Look up an element by its (case sensitive) symbol, e.g. "Se".
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        use Element::*;
        Some(match symbol {
            "H" => H,
            "B" => B,
            "C" => C,
            "N" => N,
            "O" => O,
            "F" => F,
            "Al" => Al,
            "Si" => Si,
            "P" => P,
            "S" => S,
            "Cl" => Cl,
            "Ga" => Ga,
            "Ge" => Ge,
            "As" => As,
            "Se" => Se,
            "Br" => Br,
            "In" => In,
            "Sn" => Sn,
            "Sb" => Sb,
            "Te" => Te,
            "I" => I,
            "Tl" => Tl,
            "Hg" => Hg,
            "Pb" => Pb,
            "Bi" => Bi,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        use Element::*;
        match self {
            H => "H",
            B => "B",
            C => "C",
            N => "N",
            O => "O",
            F => "F",
            Al => "Al",
            Si => "Si",
            P => "P",
            S => "S",
            Cl => "Cl",
            Ga => "Ga",
            Ge => "Ge",
            As => "As",
            Se => "Se",
            Br => "Br",
            In => "In",
            Sn => "Sn",
            Sb => "Sb",
            Te => "Te",
            I => "I",
            Tl => "Tl",
            Hg => "Hg",
            Pb => "Pb",
            Bi => "Bi",
        }
    }

    pub fn is_carbon(&self) -> bool {
        matches!(self, Element::C)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = SmilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_symbol(s).ok_or_else(|| SmilesError::UnknownElement(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bond {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl Bond {
    /// The bond order, with aromatic bonds counted as 1.
    pub fn order(&self) -> u8 {
        match self {
            Bond::Single | Bond::Aromatic => 1,
            Bond::Double => 2,
            Bond::Triple => 3,
        }
    }
}

pub type MoleculeGraph = UnGraph<Atom, Bond>;

/// Install a `tracing` subscriber printing at the given level.
///
/// Unknown levels fall back to "info". Calling this more than once is harmless,
/// later calls simply keep the first subscriber.
pub fn init_logging(level: &str) {
    let level = tracing::Level::from_str(level).unwrap_or(tracing::Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

use thiserror::Error;

/// The ways the fused ring numbering engine can fail.
///
/// A ring system the engine declines to number on purpose (too few rings, an oversized
/// ring with many fusions) is *not* an error: the call succeeds with locants cleared.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberingError {
    /// The ring system can't be laid out on a plane without rings overlapping,
    /// e.g. the higher helicenes. This is a property of the input.
    #[error("unsupported fused ring system: {0}")]
    UnsupportedStructure(String),

    /// The engine's own bookkeeping went wrong. This is a bug, not bad input.
    #[error("fused ring numbering invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl NumberingError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        NumberingError::UnsupportedStructure(reason.into())
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        NumberingError::InternalInvariantViolation(reason.into())
    }

    /// Is this a defect of the engine rather than of the input?
    pub fn is_internal(&self) -> bool {
        matches!(self, NumberingError::InternalInvariantViolation(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("Branch start '(' at position {0} without a current atom")]
    BranchNoCurrentAtom(usize),
    #[error("Branch end ')' at position {0} without a matching '('")]
    BranchEndNoStart(usize),
    #[error("Unmatched '(' in SMILES")]
    UnclosedBranch,
    #[error("Ring closure '{0}' at position {1} without a current atom")]
    RingClosureNoCurrentAtom(String, usize),
    #[error("Unclosed ring closures in SMILES: {0:?}")]
    UnclosedRings(Vec<u32>),
    #[error("Bond symbol '{0}' at position {1} is not followed by an atom")]
    DanglingBond(char, usize),
    #[error("Unclosed bracket '[' at position {0}")]
    UnclosedBracket(usize),
    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),
    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedCharacter(char, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors_are_flagged() {
        assert!(NumberingError::invariant("ring not found").is_internal());
        assert!(!NumberingError::unsupported("helicene").is_internal());
    }

    #[test]
    fn test_error_messages() {
        let err = NumberingError::unsupported("rings overlap");
        assert_eq!(err.to_string(), "unsupported fused ring system: rings overlap");
        let err = SmilesError::UnknownElement("Xx".to_string());
        assert_eq!(err.to_string(), "Unknown element symbol: Xx");
    }
}

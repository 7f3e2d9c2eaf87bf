use crate::model::types::Element;
use thiserror::Error;

/// Errors raised while reading a SMILES string into a sanitized molecule.
///
/// Positions are zero-based byte offsets into the input string; atom
/// indices refer to atoms in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unexpected end of input inside {context}")]
    UnexpectedEnd { context: &'static str },

    #[error("unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },

    #[error("'{ch}' at position {position} has no preceding atom")]
    MissingAtom { ch: char, position: usize },

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedBranch { position: usize },

    #[error("dangling bond at position {position}")]
    DanglingBond { position: usize },

    #[error("ring bond {label} is opened but never closed")]
    UnclosedRing { label: u16 },

    #[error("invalid ring bond {label} at position {position}: {details}")]
    InvalidRingBond {
        label: u16,
        position: usize,
        details: &'static str,
    },

    #[error("explicit valence {valence} for atom {atom} ({element}) is greater than permitted")]
    Valence {
        atom: usize,
        element: Element,
        valence: u8,
    },

    #[error("non-ring atom {atom} marked aromatic")]
    NonRingAromatic { atom: usize },

    #[error("cannot kekulize aromatic system containing atom {atom}")]
    Kekulize { atom: usize },
}

impl Error {
    pub(crate) fn unexpected(ch: char, position: usize) -> Self {
        Self::UnexpectedCharacter { ch, position }
    }

    pub(crate) fn ring_bond(label: u16, position: usize, details: &'static str) -> Self {
        Self::InvalidRingBond {
            label,
            position,
            details,
        }
    }
}

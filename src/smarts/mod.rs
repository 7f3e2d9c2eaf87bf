//! SMARTS substructure queries.
//!
//! [`parse_smarts`] compiles a pattern into a [`Pattern`]; the matching
//! functions search a sanitized [`Molecule`](crate::Molecule) for
//! embeddings of it. The supported language covers atom primitives
//! (element symbols, `*`, `a`, `A`, `#n`, `D`, `H`, `X`, `v`, `R`, `r`,
//! charges and isotopes), recursive `$()` environments, the `!`, `&`, `,`
//! and `;` operators on atoms and bonds, ring closures, branches and
//! dot-separated components.

mod error;
mod matcher;
mod parser;

pub use error::Error;
pub use matcher::{has_match, match_count, matched_atoms, unique_matches};
pub use parser::parse_smarts;

use crate::model::types::Element;

/// A compiled SMARTS query graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    atoms: Vec<AtomExpr>,
    bonds: Vec<QueryBond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Pattern {
    fn new(atoms: Vec<AtomExpr>, bonds: Vec<QueryBond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.i].push((bond.j, idx));
            adjacency[bond.j].push((bond.i, idx));
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct QueryBond {
    i: usize,
    j: usize,
    expr: BondExpr,
}

#[derive(Debug, Clone, PartialEq)]
enum AtomExpr {
    Primitive(AtomPrimitive),
    Not(Box<AtomExpr>),
    And(Vec<AtomExpr>),
    Or(Vec<AtomExpr>),
}

#[derive(Debug, Clone, PartialEq)]
enum AtomPrimitive {
    Any,
    Aromatic,
    Aliphatic,
    Element { element: Element, aromatic: bool },
    AtomicNumber(u8),
    /// Attached hydrogens, implicit and explicit.
    TotalHydrogens(u8),
    /// Explicit graph neighbours.
    Degree(u8),
    /// Graph neighbours plus attached hydrogens.
    Connectivity(u8),
    /// Total bond order including hydrogens, aromatic systems taken in
    /// Kekulé form.
    Valence(u8),
    /// Number of SSSR rings containing the atom; `None` for any.
    RingCount(Option<u8>),
    /// Size of the smallest SSSR ring containing the atom; `None` for any.
    RingSize(Option<u8>),
    Charge(i8),
    Isotope(u16),
    Recursive(Box<Pattern>),
}

#[derive(Debug, Clone, PartialEq)]
enum BondExpr {
    Primitive(BondPrimitive),
    Not(Box<BondExpr>),
    And(Vec<BondExpr>),
    Or(Vec<BondExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondPrimitive {
    /// No bond symbol written: single or aromatic.
    Implicit,
    Any,
    Single,
    Double,
    Triple,
    Aromatic,
    Ring,
}

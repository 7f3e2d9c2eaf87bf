//! Descriptor algorithms over sanitized molecules.
//!
//! Each submodule computes one descriptor family from a [`Molecule`] produced
//! by [`crate::smiles::parse`]. Numeric tables (Crippen contributions, TPSA
//! environments and QED desirability curves) come from [`params::Parameters`],
//! which defaults to the tables embedded at build time.

mod error;

pub mod alerts;
pub mod crippen;
pub mod lipinski;
pub mod params;
pub mod qed;
pub mod scaffold;
pub mod tpsa;
pub mod weight;

pub use error::Error;
pub use params::{Parameters, get_default_parameters, load_parameters};

use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

/// Neighbours excluding hydrogen atoms kept as graph nodes.
pub(crate) fn heavy_neighbors(
    mol: &Molecule,
    atom: usize,
) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
    mol.neighbors(atom)
        .iter()
        .filter(move |(nbr, _)| mol.atoms[*nbr].element.is_heavy())
        .map(move |&(nbr, bond)| (nbr, mol.bonds[bond].order))
}

/// Number of heavy neighbours (the SMARTS `D` of an implicit-hydrogen graph).
pub(crate) fn heavy_degree(mol: &Molecule, atom: usize) -> usize {
    heavy_neighbors(mol, atom).count()
}

/// Attached hydrogens, counting both the per-atom count and hydrogen nodes.
pub(crate) fn total_hydrogens(mol: &Molecule, atom: usize) -> usize {
    let nodes = mol
        .neighbors(atom)
        .iter()
        .filter(|(nbr, _)| mol.atoms[*nbr].is(Element::H))
        .count();
    mol.atoms[atom].hydrogens as usize + nodes
}

/// Whether `atom` has a double bond to a neighbour satisfying `pred`.
pub(crate) fn has_double_bond_to(mol: &Molecule, atom: usize, pred: impl Fn(&Atom) -> bool) -> bool {
    heavy_neighbors(mol, atom)
        .any(|(nbr, order)| order == BondOrder::Double && pred(&mol.atoms[nbr]))
}

pub(crate) fn has_bond_order(mol: &Molecule, atom: usize, order: BondOrder) -> bool {
    mol.bond_orders(atom).any(|o| o == order)
}

pub(crate) fn is_aliphatic(atom: &Atom, element: Element) -> bool {
    atom.element == element && !atom.aromatic
}

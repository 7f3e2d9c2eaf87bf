//! The chemistry toolkit seam.
//!
//! The calculator never touches molecule internals: it parses a structure
//! through a [`Toolkit`] and asks the same toolkit for each descriptor. The
//! bundled implementation is [`Builtin`]. Built with the `rdkit` feature,
//! `Rdkit` takes parsing and the scalar descriptors from RDKit instead.
//! Tests substitute their own.

#[cfg(feature = "rdkit")]
mod rdkit;

#[cfg(feature = "rdkit")]
pub use self::rdkit::{Error as RdkitError, Rdkit, RdkitMolecule};

use crate::chem::{self, Parameters};
use crate::model::molecule::Molecule;
use crate::smiles;

/// Structure parsing plus the descriptor functions the calculator needs.
///
/// Implementations are shared by reference across worker threads.
pub trait Toolkit: Send + Sync {
    type Molecule: Send;
    type ParseError: std::error::Error + Send + Sync + 'static;

    fn parse(&self, smiles: &str) -> Result<Self::Molecule, Self::ParseError>;

    fn num_hba(&self, mol: &Self::Molecule) -> u32;
    fn num_hbd(&self, mol: &Self::Molecule) -> u32;
    fn num_rings(&self, mol: &Self::Molecule) -> u32;
    fn num_rotatable_bonds(&self, mol: &Self::Molecule) -> u32;
    fn tpsa(&self, mol: &Self::Molecule) -> f64;
    /// Returns `(logP, molar refractivity)`.
    fn crippen(&self, mol: &Self::Molecule) -> (f64, f64);
    fn mol_weight(&self, mol: &Self::Molecule) -> f64;
    fn fraction_csp3(&self, mol: &Self::Molecule) -> f64;
    fn num_heavy_atoms(&self, mol: &Self::Molecule) -> usize;
    fn murcko_scaffold(&self, mol: &Self::Molecule) -> Self::Molecule;
    fn qed(&self, mol: &Self::Molecule) -> f64;
}

/// Pure-Rust toolkit backed by [`crate::smiles`] and [`crate::chem`].
#[derive(Debug, Clone)]
pub struct Builtin {
    params: Parameters,
}

impl Builtin {
    /// A toolkit using the embedded parameter tables.
    pub fn new() -> Self {
        Self::with_parameters(chem::get_default_parameters().clone())
    }

    pub fn with_parameters(params: Parameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }
}

impl Default for Builtin {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit for Builtin {
    type Molecule = Molecule;
    type ParseError = smiles::Error;

    fn parse(&self, smiles: &str) -> Result<Molecule, smiles::Error> {
        smiles::parse(smiles)
    }

    fn num_hba(&self, mol: &Molecule) -> u32 {
        chem::lipinski::num_hba(mol)
    }

    fn num_hbd(&self, mol: &Molecule) -> u32 {
        chem::lipinski::num_hbd(mol)
    }

    fn num_rings(&self, mol: &Molecule) -> u32 {
        chem::lipinski::num_rings(mol)
    }

    fn num_rotatable_bonds(&self, mol: &Molecule) -> u32 {
        chem::lipinski::num_rotatable_bonds(mol)
    }

    fn tpsa(&self, mol: &Molecule) -> f64 {
        chem::tpsa::tpsa(mol, &self.params)
    }

    fn crippen(&self, mol: &Molecule) -> (f64, f64) {
        chem::crippen::contributions(mol, &self.params)
    }

    fn mol_weight(&self, mol: &Molecule) -> f64 {
        chem::weight::mol_weight(mol)
    }

    fn fraction_csp3(&self, mol: &Molecule) -> f64 {
        chem::lipinski::fraction_csp3(mol)
    }

    fn num_heavy_atoms(&self, mol: &Molecule) -> usize {
        mol.heavy_atom_count()
    }

    fn murcko_scaffold(&self, mol: &Molecule) -> Molecule {
        chem::scaffold::murcko_scaffold(mol)
    }

    fn qed(&self, mol: &Molecule) -> f64 {
        chem::qed::qed(mol, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_reports_benzene_descriptors() {
        let toolkit = Builtin::new();
        let mol = toolkit.parse("c1ccccc1").unwrap();
        assert_eq!(toolkit.num_hba(&mol), 0);
        assert_eq!(toolkit.num_hbd(&mol), 0);
        assert_eq!(toolkit.num_rings(&mol), 1);
        assert_eq!(toolkit.num_rotatable_bonds(&mol), 0);
        assert_eq!(toolkit.num_heavy_atoms(&mol), 6);
        let scaffold = toolkit.murcko_scaffold(&mol);
        assert_eq!(toolkit.num_heavy_atoms(&scaffold), 6);
    }

    #[test]
    fn builtin_surfaces_parse_errors() {
        let toolkit = Builtin::default();
        assert!(toolkit.parse("C1CC").is_err());
        assert!(toolkit.parse("not a smiles").is_err());
    }

    #[test]
    fn custom_parameters_change_results() {
        let mut params = chem::get_default_parameters().clone();
        params.crippen.clear();
        let toolkit = Builtin::with_parameters(params);
        let mol = toolkit.parse("c1ccccc1").unwrap();
        assert_eq!(toolkit.crippen(&mol), (0.0, 0.0));
    }
}

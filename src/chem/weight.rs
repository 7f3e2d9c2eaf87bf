//! Average molecular weight.

use crate::model::molecule::Molecule;
use crate::model::types::Element;

/// Sum of average atomic masses, including attached hydrogens.
pub fn mol_weight(mol: &Molecule) -> f64 {
    let hydrogen = Element::H.atomic_mass();
    mol.atoms
        .iter()
        .map(|a| a.element.atomic_mass() + a.hydrogens as f64 * hydrogen)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse;

    fn mw(smiles: &str) -> f64 {
        mol_weight(&parse(smiles).unwrap())
    }

    #[test]
    fn small_molecules() {
        assert!((mw("c1ccccc1") - 78.114).abs() < 1e-6);
        assert!((mw("CCO") - 46.069).abs() < 1e-6);
        assert!((mw("Cc1ccccc1") - 92.141).abs() < 1e-6);
    }

    #[test]
    fn explicit_hydrogen_nodes_are_weighed() {
        assert!((mw("[H][H]") - 2.016).abs() < 1e-9);
        assert!((mw("[H]C([H])([H])[H]") - mw("C")).abs() < 1e-9);
    }

    #[test]
    fn empty_molecule_weighs_nothing() {
        assert_eq!(mw(""), 0.0);
    }
}

//! SMILES reading.
//!
//! [`parse`] turns a SMILES string into a sanitized [`Molecule`]: explicit
//! hydrogen atoms are folded into their parents, organic-subset atoms get
//! implicit hydrogens, valences are checked, aromatic input is verified to
//! be kekulizable, and ring and aromaticity information is perceived.

mod error;
mod parser;

pub use error::Error;
pub use parser::parse_graph;

use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};
use crate::perception::{aromaticity, kekule, rings};

/// Parses and sanitizes a SMILES string.
pub fn parse(smiles: &str) -> Result<Molecule, Error> {
    let mut mol = parse_graph(smiles)?;
    assign_implicit_hydrogens(&mut mol);
    let mut mol = fold_hydrogens(mol);

    let ring_info = rings::find_rings(&mol);
    mol.set_rings(ring_info);

    clear_acyclic_aromaticity(&mut mol)?;
    kekule::check(&mol)?;
    check_valences(&mol)?;
    aromaticity::perceive(&mut mol);

    Ok(mol)
}

fn assign_implicit_hydrogens(mol: &mut Molecule) {
    for idx in 0..mol.atom_count() {
        let atom = &mol.atoms[idx];
        if atom.bracket {
            continue;
        }
        let Some(valences) = atom.element.default_valences() else {
            continue;
        };
        let used = mol.bond_valence_sum(idx) + u8::from(atom.aromatic);
        let hydrogens = if atom.aromatic {
            valences[0].saturating_sub(used)
        } else {
            valences
                .iter()
                .find(|&&v| v >= used)
                .map(|v| v - used)
                .unwrap_or(0)
        };
        mol.atoms[idx].hydrogens = hydrogens;
    }
}

/// Removes hydrogen atoms written as graph nodes and adds them to the
/// parent's hydrogen count. Charged, isotopic, bridging and H–H hydrogens
/// stay in the graph.
fn fold_hydrogens(mut mol: Molecule) -> Molecule {
    let mut keep = vec![true; mol.atom_count()];
    let mut parents = Vec::new();

    for (idx, atom) in mol.atoms.iter().enumerate() {
        if atom.element != Element::H || atom.charge != 0 || atom.isotope.is_some() {
            continue;
        }
        if atom.hydrogens != 0 || mol.degree(idx) != 1 {
            continue;
        }
        let (parent, bond) = mol.neighbors(idx)[0];
        if !mol.atoms[parent].element.is_heavy() || mol.bonds[bond].order != BondOrder::Single {
            continue;
        }
        keep[idx] = false;
        parents.push(parent);
    }

    if parents.is_empty() {
        return mol;
    }
    for parent in parents {
        mol.atoms[parent].hydrogens = mol.atoms[parent].hydrogens.saturating_add(1);
    }
    mol.subgraph(&keep)
}

fn clear_acyclic_aromaticity(mol: &mut Molecule) -> Result<(), Error> {
    for idx in 0..mol.atom_count() {
        if mol.atoms[idx].aromatic && !mol.rings().is_atom_in_ring(idx) {
            return Err(Error::NonRingAromatic { atom: idx });
        }
    }
    for idx in 0..mol.bond_count() {
        if mol.bonds[idx].order == BondOrder::Aromatic && !mol.rings().is_bond_in_ring(idx) {
            mol.bonds[idx].order = BondOrder::Single;
        }
    }
    Ok(())
}

fn check_valences(mol: &Molecule) -> Result<(), Error> {
    for (idx, atom) in mol.atoms.iter().enumerate() {
        if atom.aromatic {
            continue;
        }
        let Some(valences) = atom.element.valences_with_charge(atom.charge) else {
            continue;
        };
        let valence = mol.explicit_valence(idx);
        let max = valences.iter().copied().max().unwrap_or(0);
        if valence > max {
            return Err(Error::Valence {
                atom: idx,
                element: atom.element,
                valence,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hydrogens(smiles: &str) -> Vec<u8> {
        parse(smiles).unwrap().atoms.iter().map(|a| a.hydrogens).collect()
    }

    #[test]
    fn implicit_hydrogens_for_organic_subset() {
        assert_eq!(hydrogens("CCO"), vec![3, 2, 1]);
        assert_eq!(hydrogens("C=O"), vec![2, 0]);
        assert_eq!(hydrogens("CS(=O)(=O)C"), vec![3, 0, 0, 0, 3]);
        assert_eq!(hydrogens("c1ccccc1"), vec![1; 6]);
        assert_eq!(hydrogens("c1ccncc1"), vec![1, 1, 1, 0, 1, 1]);
        assert_eq!(hydrogens("c1ccsc1"), vec![1, 1, 1, 0, 1]);
    }

    #[test]
    fn bracket_atoms_keep_written_hydrogens() {
        assert_eq!(hydrogens("[CH2]C"), vec![2, 3]);
        assert_eq!(hydrogens("c1cc[nH]c1"), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn explicit_hydrogen_atoms_are_folded() {
        let mol = parse("[H]OC([H])([H])[H]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.atoms[0].element, Element::O);
        assert_eq!(mol.atoms[0].hydrogens, 1);
        assert_eq!(mol.atoms[1].hydrogens, 3);
    }

    #[test]
    fn molecular_hydrogen_stays_in_graph() {
        let mol = parse("[H][H]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.heavy_atom_count(), 0);
    }

    #[test]
    fn kekule_input_is_perceived_aromatic() {
        let mol = parse("C1=CC=CC=C1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.aromatic));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn aromatic_bond_between_rings_becomes_single() {
        let mol = parse("c1ccccc1c1ccccc1").unwrap();
        let link = mol.bond_between(5, 6).unwrap();
        assert_eq!(mol.bonds[link].order, BondOrder::Single);
        assert_eq!(mol.rings().num_rings(), 2);
    }

    #[test]
    fn rejects_hypervalent_atoms() {
        assert!(matches!(
            parse("C(C)(C)(C)(C)C").unwrap_err(),
            Error::Valence { atom: 0, .. }
        ));
        assert!(matches!(parse("CN(=O)=O").unwrap_err(), Error::Valence { .. }));
        assert!(matches!(parse("[CH5]").unwrap_err(), Error::Valence { .. }));
    }

    #[test]
    fn accepts_charged_valences() {
        assert!(parse("C[N+](=O)[O-]").is_ok());
        assert!(parse("[NH4+]").is_ok());
        assert!(parse("C[O-]").is_ok());
        assert!(parse("[Na+].[Cl-]").is_ok());
    }

    #[test]
    fn rejects_acyclic_aromatic_atoms() {
        assert_eq!(parse("c").unwrap_err(), Error::NonRingAromatic { atom: 0 });
    }

    #[test]
    fn rejects_unkekulizable_rings() {
        assert!(matches!(parse("c1cccc1").unwrap_err(), Error::Kekulize { .. }));
        assert!(matches!(parse("c1ccnc1").unwrap_err(), Error::Kekulize { .. }));
        assert!(parse("c1cc[nH]c1").is_ok());
        assert!(parse("c1ccoc1").is_ok());
    }
}

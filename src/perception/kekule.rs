use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};
use crate::smiles::Error;

/// Verifies that the aromatic atoms of `mol` admit a Kekulé structure.
///
/// Every aromatic atom that must take part in a ring double bond is
/// matched to a partner over aromatic bonds; a missing perfect matching
/// means the aromatic system was written with the wrong electron count.
pub fn check(mol: &Molecule) -> Result<(), Error> {
    let needs: Vec<bool> = (0..mol.atom_count())
        .map(|idx| needs_double_bond(mol, idx))
        .collect();
    let mut matched = vec![false; mol.atom_count()];

    if match_all(mol, &needs, &mut matched) {
        Ok(())
    } else {
        let atom = (0..mol.atom_count())
            .find(|&i| needs[i] && !matched[i])
            .unwrap_or(0);
        Err(Error::Kekulize { atom })
    }
}

/// Whether aromatic atom `idx` takes a ring double bond in a Kekulé form.
pub(crate) fn needs_double_bond(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    if !atom.aromatic {
        return false;
    }
    if mol.count_bonds(idx, BondOrder::Double) > 0 {
        return false;
    }
    let connections = mol.total_connections(idx);
    match atom.element {
        Element::C => atom.charge == 0 && connections == 3,
        Element::N | Element::P | Element::AS => match atom.charge {
            0 => connections == 2,
            1 => connections == 3,
            _ => false,
        },
        Element::O | Element::S | Element::SE | Element::TE => atom.charge == 1 && connections == 2,
        _ => false,
    }
}

fn partners(mol: &Molecule, atom: usize, needs: &[bool], matched: &[bool]) -> Vec<usize> {
    mol.neighbors(atom)
        .iter()
        .filter(|(nbr, bond)| {
            mol.bonds[*bond].order == BondOrder::Aromatic && needs[*nbr] && !matched[*nbr]
        })
        .map(|(nbr, _)| *nbr)
        .collect()
}

fn match_all(mol: &Molecule, needs: &[bool], matched: &mut [bool]) -> bool {
    // Most constrained atom first.
    let next = (0..mol.atom_count())
        .filter(|&i| needs[i] && !matched[i])
        .map(|i| (i, partners(mol, i, needs, matched)))
        .min_by_key(|(_, p)| p.len());

    let Some((atom, options)) = next else {
        return true;
    };

    matched[atom] = true;
    for partner in options {
        matched[partner] = true;
        if match_all(mol, needs, matched) {
            return true;
        }
        matched[partner] = false;
    }
    matched[atom] = false;
    false
}

#[cfg(test)]
mod tests {
    use crate::smiles::{Error, parse};

    #[test]
    fn fused_and_heteroaromatic_systems_kekulize() {
        for smiles in [
            "c1ccc2ccccc2c1",
            "c1ccc2[nH]ccc2c1",
            "c1ccc2occc2c1",
            "c1cc[n+](C)cc1",
            "O=c1cccc[nH]1",
            "c1ccc2c(c1)ccc1ccccc12",
            "Cn1cnc2c1c(=O)n(C)c(=O)n2C",
        ] {
            assert!(parse(smiles).is_ok(), "{smiles} should kekulize");
        }
    }

    #[test]
    fn odd_electron_systems_fail() {
        for smiles in ["c1cccc1", "c1ccccc1c", "n1cccc1"] {
            assert!(
                matches!(
                    parse(smiles),
                    Err(Error::Kekulize { .. }) | Err(Error::NonRingAromatic { .. })
                ),
                "{smiles} should not kekulize"
            );
        }
    }
}

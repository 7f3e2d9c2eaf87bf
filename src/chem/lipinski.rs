//! Lipinski-style counts: hydrogen-bond acceptors and donors, rings,
//! rotatable bonds and the sp3 carbon fraction.

use super::{has_bond_order, has_double_bond_to, heavy_degree, heavy_neighbors, is_aliphatic, total_hydrogens};
use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

pub fn num_hba(mol: &Molecule) -> u32 {
    (0..mol.atom_count()).filter(|&i| is_acceptor(mol, i)).count() as u32
}

pub fn num_hbd(mol: &Molecule) -> u32 {
    (0..mol.atom_count()).filter(|&i| is_donor(mol, i)).count() as u32
}

/// Size of the smallest set of smallest rings.
pub fn num_rings(mol: &Molecule) -> u32 {
    mol.rings().num_rings() as u32
}

fn is_nops(atom: &Atom) -> bool {
    !atom.aromatic && atom.element.is_nops()
}

/// Acceptors: hydroxyl or thiol O/S not bound to an atom that is itself
/// double-bonded to N, O, P or S; divalent O/S without hydrogens; anionic
/// O/S; trivalent N not attached to such an atom through an acyclic double
/// bond; neutral pyridine-type n and aromatic o/s; and fluorine.
fn is_acceptor(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    match atom.element {
        Element::F => true,
        Element::O | Element::S if atom.aromatic => atom.charge == 0,
        Element::O | Element::S => {
            if atom.charge == -1 {
                return true;
            }
            if mol.explicit_valence(idx) != 2 {
                return false;
            }
            match total_hydrogens(mol, idx) {
                0 => true,
                1 => heavy_neighbors(mol, idx).any(|(nbr, order)| {
                    order == BondOrder::Single && !has_double_bond_to(mol, nbr, is_nops)
                }),
                _ => false,
            }
        }
        Element::N if atom.aromatic => atom.charge == 0 && total_hydrogens(mol, idx) == 0,
        Element::N => {
            mol.explicit_valence(idx) == 3
                && !heavy_neighbors(mol, idx)
                    .any(|(nbr, order)| order == BondOrder::Single && has_acyclic_double_to_nops(mol, nbr))
        }
        _ => false,
    }
}

fn has_acyclic_double_to_nops(mol: &Molecule, atom: usize) -> bool {
    mol.neighbors(atom).iter().any(|&(nbr, bond)| {
        mol.bonds[bond].order == BondOrder::Double
            && !mol.rings().is_bond_in_ring(bond)
            && is_nops(&mol.atoms[nbr])
    })
}

fn is_donor(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    let hydrogens = total_hydrogens(mol, idx);
    if hydrogens == 0 {
        return false;
    }
    match atom.element {
        Element::N if atom.aromatic => atom.charge == 0 && hydrogens == 1,
        Element::N => {
            let valence = mol.explicit_valence(idx);
            valence == 3 || (atom.charge == 1 && valence == 4)
        }
        Element::O | Element::S => !atom.aromatic && atom.charge == 0 && hydrogens == 1,
        _ => false,
    }
}

/// Strict rotatable bond count.
///
/// A bond is rotatable when it is a non-ring single bond between two
/// non-terminal atoms, neither carrying a triple bond, neither a CX3
/// (X = F, Cl, Br) or t-butyl centre, and at least one end is not the
/// carbonyl-like carbon or heteroatom of an amide, ester, thioamide or
/// amidinium linkage.
pub fn num_rotatable_bonds(mol: &Molecule) -> u32 {
    let mut count = 0;
    for (idx, bond) in mol.bonds.iter().enumerate() {
        if !matches!(bond.order, BondOrder::Single | BondOrder::Aromatic) {
            continue;
        }
        if mol.rings().is_bond_in_ring(idx) {
            continue;
        }
        let (a, b) = (bond.i, bond.j);
        if !mol.atoms[a].element.is_heavy() || !mol.atoms[b].element.is_heavy() {
            continue;
        }
        let reduced_a = is_rotor_end(mol, a);
        let reduced_b = is_rotor_end(mol, b);
        let full_a = reduced_a && !is_amide_like(mol, a);
        let full_b = reduced_b && !is_amide_like(mol, b);
        if (full_a && reduced_b) || (full_b && reduced_a) {
            count += 1;
        }
    }
    count
}

fn is_rotor_end(mol: &Molecule, atom: usize) -> bool {
    heavy_degree(mol, atom) != 1
        && !has_bond_order(mol, atom, BondOrder::Triple)
        && !is_trihalomethyl(mol, atom)
        && !is_tert_butyl(mol, atom)
}

fn is_trihalomethyl(mol: &Molecule, atom: usize) -> bool {
    if !is_aliphatic(&mol.atoms[atom], Element::C) {
        return false;
    }
    [Element::F, Element::CL, Element::BR].iter().any(|&halogen| {
        heavy_neighbors(mol, atom)
            .filter(|(nbr, _)| mol.atoms[*nbr].is(halogen))
            .count()
            >= 3
    })
}

fn is_tert_butyl(mol: &Molecule, atom: usize) -> bool {
    if !is_aliphatic(&mol.atoms[atom], Element::C) {
        return false;
    }
    heavy_neighbors(mol, atom)
        .filter(|(nbr, _)| is_aliphatic(&mol.atoms[*nbr], Element::C) && total_hydrogens(mol, *nbr) == 3)
        .count()
        >= 3
}

fn is_trigonal_carbon(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(&mol.atoms[atom], Element::C) && heavy_degree(mol, atom) == 3
}

fn is_amide_partner(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    a.is(Element::N)
        || is_aliphatic(a, Element::O)
        || (is_aliphatic(a, Element::S) && heavy_degree(mol, atom) != 1)
}

/// Acyclic single-bond neighbours of `atom`.
fn acyclic_single_neighbors(mol: &Molecule, atom: usize) -> impl Iterator<Item = usize> + '_ {
    mol.neighbors(atom)
        .iter()
        .filter(move |&&(nbr, bond)| {
            mol.bonds[bond].order == BondOrder::Single
                && !mol.rings().is_bond_in_ring(bond)
                && mol.atoms[nbr].element.is_heavy()
        })
        .map(|&(nbr, _)| nbr)
}

fn has_double_to_nos(mol: &Molecule, atom: usize) -> bool {
    has_double_bond_to(mol, atom, |a| {
        !a.aromatic && matches!(a.element, Element::N | Element::O | Element::S)
    })
}

fn has_double_to_cationic_n(mol: &Molecule, atom: usize) -> bool {
    has_double_bond_to(mol, atom, |a| is_aliphatic(a, Element::N) && a.charge == 1)
}

fn is_amide_like(mol: &Molecule, atom: usize) -> bool {
    let is_n_not_terminal = |nbr: usize| mol.atoms[nbr].is(Element::N) && heavy_degree(mol, nbr) != 1;

    if is_trigonal_carbon(mol, atom) {
        if has_double_to_nos(mol, atom)
            && acyclic_single_neighbors(mol, atom).any(|nbr| is_amide_partner(mol, nbr))
        {
            return true;
        }
        if has_double_to_cationic_n(mol, atom) && acyclic_single_neighbors(mol, atom).any(is_n_not_terminal) {
            return true;
        }
    }
    if is_amide_partner(mol, atom)
        && acyclic_single_neighbors(mol, atom)
            .any(|nbr| is_trigonal_carbon(mol, nbr) && has_double_to_nos(mol, nbr))
    {
        return true;
    }
    if is_n_not_terminal(atom)
        && acyclic_single_neighbors(mol, atom)
            .any(|nbr| is_trigonal_carbon(mol, nbr) && has_double_to_cationic_n(mol, nbr))
    {
        return true;
    }
    false
}

/// Fraction of carbons that are sp3 (only single bonds); zero without carbons.
pub fn fraction_csp3(mol: &Molecule) -> f64 {
    let mut carbons = 0usize;
    let mut sp3 = 0usize;
    for (idx, atom) in mol.atoms.iter().enumerate() {
        if !atom.is(Element::C) {
            continue;
        }
        carbons += 1;
        if !atom.aromatic && mol.bond_orders(idx).all(|o| o == BondOrder::Single) {
            sp3 += 1;
        }
    }
    if carbons == 0 {
        0.0
    } else {
        sp3 as f64 / carbons as f64
    }
}

use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

/// Marks rings satisfying Hückel's 4n+2 rule as aromatic.
///
/// Rings are revisited until nothing changes so that a ring fused to an
/// already aromatic ring can use the shared atoms' electrons.
pub fn perceive(mol: &mut Molecule) {
    let rings = mol.rings().clone();

    loop {
        let mut changed = false;
        for (atoms, bonds) in rings.atom_rings.iter().zip(&rings.bond_rings) {
            let done = atoms.iter().all(|&a| mol.atoms[a].aromatic)
                && bonds.iter().all(|&b| mol.bonds[b].order == BondOrder::Aromatic);
            if done {
                continue;
            }
            let Some(electrons) = pi_electrons(mol, atoms) else {
                continue;
            };
            if is_huckel(electrons) {
                for &a in atoms {
                    mol.atoms[a].aromatic = true;
                }
                for &b in bonds {
                    mol.bonds[b].order = BondOrder::Aromatic;
                }
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn is_huckel(electrons: u32) -> bool {
    electrons >= 2 && (electrons - 2) % 4 == 0
}

fn pi_electrons(mol: &Molecule, ring: &[usize]) -> Option<u32> {
    ring.iter()
        .map(|&atom| contribution(mol, atom, ring))
        .sum()
}

fn is_exocyclic_heteroatom(element: Element) -> bool {
    matches!(element, Element::O | Element::N | Element::S)
}

fn contribution(mol: &Molecule, idx: usize, ring: &[usize]) -> Option<u32> {
    let atom = &mol.atoms[idx];
    if atom.aromatic {
        return Some(aromatic_contribution(mol, idx, ring));
    }

    let mut double_partner = None;
    for &(nbr, bond) in mol.neighbors(idx) {
        match mol.bonds[bond].order {
            BondOrder::Double => {
                if double_partner.is_some() {
                    return None;
                }
                double_partner = Some(nbr);
            }
            BondOrder::Triple | BondOrder::Quadruple => return None,
            BondOrder::Aromatic => return Some(1),
            BondOrder::Single => {}
        }
    }

    if let Some(partner) = double_partner {
        if ring.contains(&partner) {
            return Some(1);
        }
        let other = &mol.atoms[partner];
        if atom.is(Element::C) && is_exocyclic_heteroatom(other.element) {
            return Some(0);
        }
        return other.aromatic.then_some(1);
    }

    let connections = mol.total_connections(idx);
    match (atom.element, atom.charge) {
        (Element::N | Element::P | Element::AS, 0) if connections == 3 => Some(2),
        (Element::O | Element::S | Element::SE | Element::TE, 0) if connections == 2 => Some(2),
        (Element::C, -1) if connections == 3 => Some(2),
        (Element::C, 1) if connections == 3 => Some(0),
        (Element::B, 0) if connections == 3 => Some(0),
        _ => None,
    }
}

fn aromatic_contribution(mol: &Molecule, idx: usize, ring: &[usize]) -> u32 {
    let atom = &mol.atoms[idx];
    let exocyclic_hetero = mol.neighbors(idx).iter().any(|&(nbr, bond)| {
        mol.bonds[bond].order == BondOrder::Double
            && !ring.contains(&nbr)
            && is_exocyclic_heteroatom(mol.atoms[nbr].element)
    });
    if exocyclic_hetero {
        return 0;
    }
    let connections = mol.total_connections(idx);
    match (atom.element, atom.charge) {
        (Element::C, -1) => 2,
        (Element::C, 1) => 0,
        (Element::N | Element::P | Element::AS, 0) if connections == 3 => 2,
        (Element::O | Element::S | Element::SE | Element::TE, 0) => 2,
        (Element::B, _) => 0,
        _ => 1,
    }
}

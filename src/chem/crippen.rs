//! Wildman–Crippen logP and molar refractivity.
//!
//! Every heavy atom is assigned one of the Wildman–Crippen atom types, and
//! every attached hydrogen a hydrogen type derived from its parent. The
//! molecule's logP and MR are the sums of the per-type contributions from
//! [`Parameters`]. Types without a table entry contribute nothing.

use super::params::Parameters;
use super::{has_bond_order, has_double_bond_to, heavy_neighbors, total_hydrogens};
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

/// Returns `(logP, MR)`.
pub fn contributions(mol: &Molecule, params: &Parameters) -> (f64, f64) {
    let mut logp = 0.0;
    let mut mr = 0.0;

    for idx in 0..mol.atom_count() {
        let atom = &mol.atoms[idx];
        let heavy_type = if atom.is(Element::H) {
            let parent = mol.neighbors(idx).first().map(|(nbr, _)| *nbr);
            hydrogen_type(mol, parent)
        } else {
            atom_type(mol, idx)
        };
        let c = params.crippen(heavy_type);
        logp += c.logp;
        mr += c.mr;

        if atom.hydrogens > 0 {
            let h = params.crippen(hydrogen_type(mol, Some(idx)));
            logp += h.logp * atom.hydrogens as f64;
            mr += h.mr * atom.hydrogens as f64;
        }
    }

    (logp, mr)
}

/// The Wildman–Crippen type of a non-hydrogen atom.
pub fn atom_type(mol: &Molecule, idx: usize) -> &'static str {
    let atom = &mol.atoms[idx];
    match atom.element {
        Element::C => carbon_type(mol, idx),
        Element::N => nitrogen_type(mol, idx),
        Element::O => oxygen_type(mol, idx),
        Element::F | Element::CL | Element::BR | Element::I if atom.charge < 0 => "Hal",
        Element::F => "F",
        Element::CL => "Cl",
        Element::BR => "Br",
        Element::I => "I",
        Element::P => "P",
        Element::S if atom.aromatic => "S3",
        Element::S if atom.charge != 0 => "S2",
        Element::S => "S1",
        _ => "Me1",
    }
}

/// The type of a hydrogen attached to `parent` (`None` for a lone hydrogen).
pub fn hydrogen_type(mol: &Molecule, parent: Option<usize>) -> &'static str {
    let Some(parent) = parent else {
        return "HS";
    };
    match mol.atoms[parent].element {
        Element::H | Element::C => "H1",
        Element::N => "H3",
        Element::O => {
            let mut kind = "H2";
            for (nbr, _) in heavy_neighbors(mol, parent) {
                let other = &mol.atoms[nbr];
                match other.element {
                    Element::N => return "H3",
                    Element::O | Element::S => kind = "H4",
                    Element::C if !other.aromatic && has_bond_order(mol, nbr, BondOrder::Double) => {
                        kind = "H4"
                    }
                    _ => {}
                }
            }
            kind
        }
        _ => "H2",
    }
}

fn is_crippen_hetero(element: Element) -> bool {
    matches!(
        element,
        Element::N | Element::O | Element::P | Element::S | Element::F | Element::CL | Element::BR | Element::I
    )
}

fn carbon_type(mol: &Molecule, idx: usize) -> &'static str {
    let atom = &mol.atoms[idx];
    if atom.aromatic {
        return aromatic_carbon_type(mol, idx);
    }
    if atom.charge != 0 {
        return "CS";
    }
    if has_bond_order(mol, idx, BondOrder::Triple) {
        return "C7";
    }

    let aromatic_neighbor = heavy_neighbors(mol, idx).find(|(nbr, _)| mol.atoms[*nbr].aromatic);

    if has_bond_order(mol, idx, BondOrder::Double) {
        if has_double_bond_to(mol, idx, |a| !a.is(Element::C)) {
            return "C5";
        }
        return if aromatic_neighbor.is_some() { "C26" } else { "C6" };
    }

    let hydrogens = total_hydrogens(mol, idx);
    if let Some((nbr, _)) = aromatic_neighbor {
        return match hydrogens {
            3 if mol.atoms[nbr].is(Element::C) => "C8",
            3 => "C9",
            2 => "C10",
            1 => "C11",
            _ => "C12",
        };
    }

    let hetero = heavy_neighbors(mol, idx).any(|(nbr, _)| is_crippen_hetero(mol.atoms[nbr].element));
    match (hetero, hydrogens >= 2) {
        (false, true) => "C1",
        (false, false) => "C2",
        (true, true) => "C3",
        (true, false) => "C4",
    }
}

fn aromatic_carbon_type(mol: &Molecule, idx: usize) -> &'static str {
    let mut substituent = None;
    let mut ring_bonds = 0;
    for (nbr, order) in heavy_neighbors(mol, idx) {
        match mol.atoms[nbr].element {
            Element::F => return "C14",
            Element::CL => return "C15",
            Element::BR => return "C16",
            Element::I => return "C17",
            _ => {}
        }
        if order == BondOrder::Aromatic {
            ring_bonds += 1;
        } else {
            substituent = Some((nbr, order));
        }
    }

    if total_hydrogens(mol, idx) > 0 {
        return "C18";
    }
    if ring_bonds >= 3 {
        return "C19";
    }

    let Some((nbr, order)) = substituent else {
        return "CS";
    };
    let other = &mol.atoms[nbr];
    if order == BondOrder::Double {
        return match other.element {
            Element::C | Element::N | Element::O => "C25",
            _ => "CS",
        };
    }
    if other.aromatic {
        return "C20";
    }
    match other.element {
        Element::C => "C21",
        Element::N => "C22",
        Element::O => "C23",
        Element::S => "C24",
        _ => "CS",
    }
}

fn nitrogen_type(mol: &Molecule, idx: usize) -> &'static str {
    let atom = &mol.atoms[idx];
    if atom.aromatic {
        return if atom.charge == 0 { "N11" } else { "N12" };
    }

    let hydrogens = total_hydrogens(mol, idx);
    let degree = heavy_neighbors(mol, idx).count();
    let has_double = has_bond_order(mol, idx, BondOrder::Double);

    if atom.charge > 0 {
        if hydrogens > 0 {
            return "N10";
        }
        let all_single = mol.bond_orders(idx).all(|o| o == BondOrder::Single);
        return match (degree, all_single, has_double) {
            (4, true, _) | (3, _, true) => "N13",
            _ => "N14",
        };
    }
    if atom.charge < 0 {
        return "N14";
    }
    if has_bond_order(mol, idx, BondOrder::Triple) {
        return "N9";
    }

    let aromatic_neighbor = heavy_neighbors(mol, idx).any(|(nbr, _)| mol.atoms[nbr].aromatic);
    match hydrogens {
        2.. if aromatic_neighbor => "N3",
        2.. => "N1",
        1 if has_double => "N5",
        1 if aromatic_neighbor => "N4",
        1 => "N2",
        _ if has_double => "N6",
        _ if degree == 3 && aromatic_neighbor => "N8",
        _ if degree == 3 => "N7",
        _ => "NS",
    }
}

fn oxygen_type(mol: &Molecule, idx: usize) -> &'static str {
    let atom = &mol.atoms[idx];
    if atom.aromatic {
        return "O1";
    }
    if atom.charge < 0 {
        let parent = heavy_neighbors(mol, idx).next().map(|(nbr, _)| mol.atoms[nbr].element);
        return match parent {
            Some(Element::N) => "O5",
            Some(Element::S) | Some(Element::P) => "O6",
            _ => "O12",
        };
    }
    if atom.charge > 0 {
        return "OS";
    }
    if total_hydrogens(mol, idx) > 0 {
        return "O2";
    }

    let double_partner = heavy_neighbors(mol, idx)
        .find(|(_, order)| *order == BondOrder::Double)
        .map(|(nbr, _)| nbr);
    if let Some(partner) = double_partner {
        let other = &mol.atoms[partner];
        return match other.element {
            Element::N | Element::O => "O5",
            Element::C if other.aromatic => "O8",
            Element::C => carbonyl_oxygen_type(mol, partner, idx),
            _ => "OS",
        };
    }

    if heavy_neighbors(mol, idx).any(|(nbr, _)| mol.atoms[nbr].aromatic) {
        "O4"
    } else {
        "O3"
    }
}

fn carbonyl_oxygen_type(mol: &Molecule, carbon: usize, oxygen: usize) -> &'static str {
    let substituents: Vec<usize> = heavy_neighbors(mol, carbon)
        .map(|(nbr, _)| nbr)
        .filter(|&nbr| nbr != oxygen)
        .collect();
    if substituents.iter().any(|&nbr| mol.atoms[nbr].aromatic) {
        return "O10";
    }
    if substituents.len() == 2 && substituents.iter().all(|&nbr| !mol.atoms[nbr].is(Element::C)) {
        return "O11";
    }
    "O9"
}

//! Bemis–Murcko scaffolds.

use super::heavy_neighbors;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;
use crate::perception::rings::find_rings;

/// Ring systems plus the linkers between them.
///
/// Non-ring atoms are pruned repeatedly while they have at most one
/// remaining neighbour. Atoms double-bonded to a surviving atom are then
/// restored. A molecule without rings yields an empty scaffold.
pub fn murcko_scaffold(mol: &Molecule) -> Molecule {
    if mol.rings().num_rings() == 0 {
        return Molecule::default();
    }

    let n = mol.atom_count();
    let mut keep: Vec<bool> = mol.atoms.iter().map(|a| a.element.is_heavy()).collect();

    let mut changed = true;
    while changed {
        changed = false;
        for idx in 0..n {
            if !keep[idx] || mol.rings().is_atom_in_ring(idx) {
                continue;
            }
            let remaining = heavy_neighbors(mol, idx).filter(|(nbr, _)| keep[*nbr]).count();
            if remaining <= 1 {
                keep[idx] = false;
                changed = true;
            }
        }
    }

    let core = keep.clone();
    for idx in 0..n {
        if core[idx] {
            continue;
        }
        let attached = heavy_neighbors(mol, idx)
            .any(|(nbr, order)| order == BondOrder::Double && core[nbr]);
        if attached && mol.atoms[idx].element.is_heavy() {
            keep[idx] = true;
        }
    }

    let mut scaffold = mol.subgraph(&keep);
    let rings = find_rings(&scaffold);
    scaffold.set_rings(rings);
    scaffold
}

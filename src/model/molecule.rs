use super::atom::Atom;
use super::rings::RingInfo;
use super::types::BondOrder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// The atom on the other end of the bond from `atom`.
    #[inline]
    pub fn other(&self, atom: usize) -> usize {
        if self.i == atom { self.j } else { self.i }
    }
}

/// A molecular graph with hydrogens stored as per-atom counts.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
    rings: RingInfo,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.i].push((bond.j, idx));
            adjacency[bond.j].push((bond.i, idx));
        }
        Self {
            atoms,
            bonds,
            adjacency,
            rings: RingInfo::default(),
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

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.element.is_heavy()).count()
    }

    /// Neighbouring atom indices paired with the connecting bond index.
    #[inline]
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    #[inline]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Degree plus attached hydrogens.
    #[inline]
    pub fn total_connections(&self, atom: usize) -> usize {
        self.degree(atom) + self.atoms[atom].hydrogens as usize
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|(nbr, _)| *nbr == b)
            .map(|(_, bond)| *bond)
    }

    pub fn bond_orders(&self, atom: usize) -> impl Iterator<Item = BondOrder> + '_ {
        self.adjacency[atom]
            .iter()
            .map(move |(_, bond)| self.bonds[*bond].order)
    }

    pub fn count_bonds(&self, atom: usize, order: BondOrder) -> usize {
        self.bond_orders(atom).filter(|o| *o == order).count()
    }

    /// Sum of bond valences, counting aromatic bonds as one each.
    pub fn bond_valence_sum(&self, atom: usize) -> u8 {
        self.bond_orders(atom).map(|o| o.valence()).sum()
    }

    /// Valence including hydrogens, with one extra unit for the pi electron
    /// of an atom carrying aromatic bonds.
    pub fn explicit_valence(&self, atom: usize) -> u8 {
        let pi = u8::from(self.count_bonds(atom, BondOrder::Aromatic) > 0);
        self.bond_valence_sum(atom) + pi + self.atoms[atom].hydrogens
    }

    #[inline]
    pub fn rings(&self) -> &RingInfo {
        &self.rings
    }

    pub fn set_rings(&mut self, rings: RingInfo) {
        self.rings = rings;
    }

    /// Builds the induced subgraph over atoms flagged in `keep`.
    ///
    /// Ring information is not carried over.
    pub fn subgraph(&self, keep: &[bool]) -> Molecule {
        let mut remap = vec![usize::MAX; self.atoms.len()];
        let mut atoms = Vec::new();
        for (idx, atom) in self.atoms.iter().enumerate() {
            if keep[idx] {
                remap[idx] = atoms.len();
                atoms.push(atom.clone());
            }
        }
        let bonds = self
            .bonds
            .iter()
            .filter(|b| keep[b.i] && keep[b.j])
            .map(|b| Bond::new(remap[b.i], remap[b.j], b.order))
            .collect();
        Molecule::new(atoms, bonds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;

    fn ethanol() -> Molecule {
        let mut c1 = Atom::new(Element::C);
        c1.hydrogens = 3;
        let mut c2 = Atom::new(Element::C);
        c2.hydrogens = 2;
        let mut o = Atom::new(Element::O);
        o.hydrogens = 1;
        Molecule::new(
            vec![c1, c2, o],
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(2, 1, BondOrder::Single),
            ],
        )
    }

    #[test]
    fn bond_new_orders_indices() {
        let b = Bond::new(5, 2, BondOrder::Double);
        assert_eq!((b.i, b.j), (2, 5));
        assert_eq!(b.other(2), 5);
        assert_eq!(b.other(5), 2);
    }

    #[test]
    fn adjacency_and_degrees() {
        let mol = ethanol();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.heavy_atom_count(), 3);
        assert_eq!(mol.degree(1), 2);
        assert_eq!(mol.total_connections(0), 4);
        assert_eq!(mol.bond_between(0, 1), Some(0));
        assert_eq!(mol.bond_between(0, 2), None);
        assert_eq!(mol.explicit_valence(1), 4);
    }

    #[test]
    fn subgraph_remaps_bonds() {
        let mol = ethanol();
        let sub = mol.subgraph(&[false, true, true]);
        assert_eq!(sub.atom_count(), 2);
        assert_eq!(sub.bonds, vec![Bond::new(0, 1, BondOrder::Single)]);
        assert_eq!(sub.atoms[1].element, Element::O);
    }
}

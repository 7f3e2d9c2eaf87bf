/// Ring membership for a molecule, computed during sanitization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingInfo {
    /// Smallest set of smallest rings, each as atom indices in ring order.
    pub atom_rings: Vec<Vec<usize>>,
    /// Bond indices of each ring in `atom_rings`.
    pub bond_rings: Vec<Vec<usize>>,
    /// Cyclomatic number (bonds - atoms + connected components).
    pub cyclomatic: usize,
    atom_in_ring: Vec<bool>,
    bond_in_ring: Vec<bool>,
}

impl RingInfo {
    pub fn new(
        atom_rings: Vec<Vec<usize>>,
        bond_rings: Vec<Vec<usize>>,
        cyclomatic: usize,
        atom_in_ring: Vec<bool>,
        bond_in_ring: Vec<bool>,
    ) -> Self {
        Self {
            atom_rings,
            bond_rings,
            cyclomatic,
            atom_in_ring,
            bond_in_ring,
        }
    }

    #[inline]
    pub fn num_rings(&self) -> usize {
        self.cyclomatic
    }

    #[inline]
    pub fn is_atom_in_ring(&self, atom: usize) -> bool {
        self.atom_in_ring.get(atom).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_bond_in_ring(&self, bond: usize) -> bool {
        self.bond_in_ring.get(bond).copied().unwrap_or(false)
    }

    pub fn is_atom_in_ring_of_size(&self, atom: usize, size: usize) -> bool {
        self.atom_rings
            .iter()
            .any(|ring| ring.len() == size && ring.contains(&atom))
    }
}

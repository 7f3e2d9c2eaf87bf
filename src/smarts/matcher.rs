use std::collections::HashSet;

use super::{AtomExpr, AtomPrimitive, BondExpr, BondPrimitive, Pattern};
use crate::chem::total_hydrogens;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;
use crate::perception::kekule;

const UNMAPPED: usize = usize::MAX;

/// Whether `pattern` occurs anywhere in `mol`.
pub fn has_match(mol: &Molecule, pattern: &Pattern) -> bool {
    let mut found = false;
    Search::new(mol, pattern, None).run(&mut |_| {
        found = true;
        true
    });
    found
}

/// Every embedding of `pattern`, keeping one per distinct set of atoms.
///
/// Each match lists target atoms in pattern atom order.
pub fn unique_matches(mol: &Molecule, pattern: &Pattern) -> Vec<Vec<usize>> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    Search::new(mol, pattern, None).run(&mut |mapping| {
        let mut key = mapping.to_vec();
        key.sort_unstable();
        if seen.insert(key) {
            matches.push(mapping.to_vec());
        }
        false
    });
    matches
}

/// Number of embeddings of `pattern` with distinct atom sets.
pub fn match_count(mol: &Molecule, pattern: &Pattern) -> usize {
    unique_matches(mol, pattern).len()
}

/// Flags the atoms of `mol` covered by at least one embedding of `pattern`.
pub fn matched_atoms(mol: &Molecule, pattern: &Pattern) -> Vec<bool> {
    let mut covered = vec![false; mol.atom_count()];
    for matched in unique_matches(mol, pattern) {
        for atom in matched {
            covered[atom] = true;
        }
    }
    covered
}

/// Backtracking search over pattern atoms in breadth-first order, so every
/// atom after the first of its component is reached through a mapped
/// neighbour.
struct Search<'a> {
    mol: &'a Molecule,
    pattern: &'a Pattern,
    order: Vec<(usize, Option<usize>)>,
    root: Option<usize>,
    mapping: Vec<usize>,
    used: Vec<bool>,
}

impl<'a> Search<'a> {
    fn new(mol: &'a Molecule, pattern: &'a Pattern, root: Option<usize>) -> Self {
        Self {
            mol,
            pattern,
            order: visit_order(pattern),
            root,
            mapping: vec![UNMAPPED; pattern.atom_count()],
            used: vec![false; mol.atom_count()],
        }
    }

    fn run(&mut self, visit: &mut dyn FnMut(&[usize]) -> bool) -> bool {
        self.extend(0, visit)
    }

    fn extend(&mut self, depth: usize, visit: &mut dyn FnMut(&[usize]) -> bool) -> bool {
        let Some(&(query, parent)) = self.order.get(depth) else {
            return visit(&self.mapping);
        };

        let candidates: Vec<usize> = match (parent, self.root) {
            (Some(parent), _) => self
                .mol
                .neighbors(self.mapping[parent])
                .iter()
                .map(|(nbr, _)| *nbr)
                .collect(),
            (None, Some(root)) if depth == 0 => vec![root],
            (None, _) => (0..self.mol.atom_count()).collect(),
        };

        for target in candidates {
            if self.used[target] || !self.feasible(query, target) {
                continue;
            }
            self.mapping[query] = target;
            self.used[target] = true;
            let stop = self.extend(depth + 1, visit);
            self.used[target] = false;
            self.mapping[query] = UNMAPPED;
            if stop {
                return true;
            }
        }
        false
    }

    fn feasible(&self, query: usize, target: usize) -> bool {
        if !atom_matches(self.mol, &self.pattern.atoms[query], target) {
            return false;
        }
        self.pattern.neighbors(query).iter().all(|&(other, bond)| {
            let image = self.mapping[other];
            if image == UNMAPPED {
                return true;
            }
            self.mol
                .bond_between(target, image)
                .is_some_and(|b| bond_matches(self.mol, &self.pattern.bonds[bond].expr, b))
        })
    }
}

fn visit_order(pattern: &Pattern) -> Vec<(usize, Option<usize>)> {
    let mut order = Vec::with_capacity(pattern.atom_count());
    let mut seen = vec![false; pattern.atom_count()];
    for start in 0..pattern.atom_count() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let first = order.len();
        order.push((start, None));
        let mut cursor = first;
        while cursor < order.len() {
            let (atom, _) = order[cursor];
            for &(nbr, _) in pattern.neighbors(atom) {
                if !seen[nbr] {
                    seen[nbr] = true;
                    order.push((nbr, Some(atom)));
                }
            }
            cursor += 1;
        }
    }
    order
}

fn atom_matches(mol: &Molecule, expr: &AtomExpr, idx: usize) -> bool {
    match expr {
        AtomExpr::Primitive(p) => primitive_matches(mol, p, idx),
        AtomExpr::Not(inner) => !atom_matches(mol, inner, idx),
        AtomExpr::And(terms) => terms.iter().all(|t| atom_matches(mol, t, idx)),
        AtomExpr::Or(terms) => terms.iter().any(|t| atom_matches(mol, t, idx)),
    }
}

fn primitive_matches(mol: &Molecule, primitive: &AtomPrimitive, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    let rings = mol.rings();
    match primitive {
        AtomPrimitive::Any => true,
        AtomPrimitive::Aromatic => atom.aromatic,
        AtomPrimitive::Aliphatic => !atom.aromatic,
        AtomPrimitive::Element { element, aromatic } => {
            atom.element == *element && atom.aromatic == *aromatic
        }
        AtomPrimitive::AtomicNumber(z) => atom.element.atomic_number() == *z,
        AtomPrimitive::TotalHydrogens(n) => total_hydrogens(mol, idx) == *n as usize,
        AtomPrimitive::Degree(n) => mol.degree(idx) == *n as usize,
        AtomPrimitive::Connectivity(n) => mol.total_connections(idx) == *n as usize,
        AtomPrimitive::Valence(n) => total_valence(mol, idx) == *n as usize,
        AtomPrimitive::RingCount(None) | AtomPrimitive::RingSize(None) => {
            rings.is_atom_in_ring(idx)
        }
        AtomPrimitive::RingCount(Some(n)) => {
            rings.atom_rings.iter().filter(|r| r.contains(&idx)).count() == *n as usize
        }
        AtomPrimitive::RingSize(Some(n)) => {
            let smallest = rings
                .atom_rings
                .iter()
                .filter(|r| r.contains(&idx))
                .map(Vec::len)
                .min()
                .unwrap_or(0);
            smallest == *n as usize
        }
        AtomPrimitive::Charge(charge) => atom.charge == *charge,
        AtomPrimitive::Isotope(isotope) => atom.isotope == Some(*isotope),
        AtomPrimitive::Recursive(inner) => {
            let mut found = false;
            Search::new(mol, inner, Some(idx)).run(&mut |_| {
                found = true;
                true
            });
            found
        }
    }
}

/// Bond orders and hydrogens summed with aromatic bonds taken as single
/// bonds, plus one for an aromatic atom that takes a ring double bond in
/// the Kekulé form.
fn total_valence(mol: &Molecule, idx: usize) -> usize {
    let pi = usize::from(kekule::needs_double_bond(mol, idx));
    mol.bond_valence_sum(idx) as usize + mol.atoms[idx].hydrogens as usize + pi
}

fn bond_matches(mol: &Molecule, expr: &BondExpr, bond: usize) -> bool {
    match expr {
        BondExpr::Primitive(p) => {
            let order = mol.bonds[bond].order;
            match p {
                BondPrimitive::Implicit => {
                    matches!(order, BondOrder::Single | BondOrder::Aromatic)
                }
                BondPrimitive::Any => true,
                BondPrimitive::Single => order == BondOrder::Single,
                BondPrimitive::Double => order == BondOrder::Double,
                BondPrimitive::Triple => order == BondOrder::Triple,
                BondPrimitive::Aromatic => order == BondOrder::Aromatic,
                BondPrimitive::Ring => mol.rings().is_bond_in_ring(bond),
            }
        }
        BondExpr::Not(inner) => !bond_matches(mol, inner, bond),
        BondExpr::And(terms) => terms.iter().all(|t| bond_matches(mol, t, bond)),
        BondExpr::Or(terms) => terms.iter().any(|t| bond_matches(mol, t, bond)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smarts::parse_smarts;
    use crate::smiles::parse;

    fn hits(smiles: &str, smarts: &str) -> usize {
        match_count(&parse(smiles).unwrap(), &parse_smarts(smarts).unwrap())
    }

    fn found(smiles: &str, smarts: &str) -> bool {
        has_match(&parse(smiles).unwrap(), &parse_smarts(smarts).unwrap())
    }

    #[test]
    fn aromatic_and_aliphatic_symbols_are_distinct() {
        assert_eq!(hits("c1ccccc1C", "c"), 6);
        assert_eq!(hits("c1ccccc1C", "C"), 1);
        assert_eq!(hits("c1ccccc1C", "[#6]"), 7);
        assert_eq!(hits("c1ccccc1C", "a"), 6);
        assert_eq!(hits("c1ccccc1C", "A"), 1);
    }

    #[test]
    fn matches_are_unique_by_atom_set() {
        assert_eq!(hits("CCC", "CC"), 2);
        assert_eq!(hits("c1ccccc1", "c1ccccc1"), 1);
        assert_eq!(hits("CC(=O)O", "C=O"), 1);
        assert_eq!(hits("OCCO", "O.O"), 1);
    }

    #[test]
    fn implicit_bonds_are_single_or_aromatic() {
        assert!(found("c1ccccc1", "cc"));
        assert!(!found("c1ccccc1", "c-c"));
        assert!(found("c1ccccc1", "c:c"));
        assert!(!found("C=C", "CC"));
        assert!(found("C=C", "C~C"));
        assert!(found("c1ccccc1-c1ccccc1", "c-c"));
    }

    #[test]
    fn hydrogen_degree_and_connectivity() {
        let mol = parse("CC(C)(C)O").unwrap();
        assert_eq!(match_count(&mol, &parse_smarts("[CH3]").unwrap()), 3);
        assert_eq!(match_count(&mol, &parse_smarts("[CD4]").unwrap()), 1);
        assert_eq!(match_count(&mol, &parse_smarts("[CX4]").unwrap()), 4);
        assert_eq!(match_count(&mol, &parse_smarts("[OH1;X2;v2]").unwrap()), 1);
        assert_eq!(match_count(&mol, &parse_smarts("[D1]").unwrap()), 4);
    }

    #[test]
    fn valence_counts_the_kekule_double_bond() {
        assert_eq!(hits("c1ccccc1", "[cv4]"), 6);
        assert_eq!(hits("c1ccncc1", "[nv3]"), 1);
        assert_eq!(hits("c1cc[nH]c1", "[nv3]"), 1);
        assert_eq!(hits("CC(=O)N", "[Nv3]"), 1);
        assert_eq!(hits("C[N+](C)(C)C", "[Nv4X4]"), 1);
    }

    #[test]
    fn ring_primitives() {
        // Decalin: the two bridgehead carbons sit in both rings.
        assert_eq!(hits("C1CCC2CCCCC2C1", "[CR2]"), 2);
        assert_eq!(hits("C1CCC2CCCCC2C1", "[CR1]"), 8);
        assert_eq!(hits("C1CCC2CCCCC2C1", "[R0]"), 0);
        assert_eq!(hits("CC1CC1", "[r3]"), 3);
        assert_eq!(hits("CC1CC1", "[C!r]"), 1);
        assert!(found("C1CCCCC1=CC", "C=!@C"));
        assert!(!found("C1=CCCCC1", "C=!@C"));
        assert!(found("C1=CCCCC1", "C=@C"));
    }

    #[test]
    fn charges_and_isotopes() {
        assert_eq!(hits("C[N+](=O)[O-]", "[N+](=O)[O-]"), 1);
        assert_eq!(hits("CC(=O)[O-]", "[O-;X1]"), 1);
        assert_eq!(hits("CC(=O)[O-]", "[#8;+0]"), 1);
        assert_eq!(hits("[13CH4]", "[13C]"), 1);
        assert_eq!(hits("C", "[13C]"), 0);
    }

    #[test]
    fn recursive_environments_constrain_the_root() {
        let amine = "[$([N;+0;X3;v3]);!$(N[C,S]=O)]";
        assert_eq!(hits("CN(C)C", amine), 1);
        assert_eq!(hits("CC(=O)N(C)C", amine), 0);
        assert_eq!(hits("CS(=O)(=O)N(C)C", amine), 0);
        assert_eq!(hits("C1CCCCC1c1ccccc1", "[$([A;R][!a])]"), 6);
        // The fluorene methylene only touches aromatic atoms.
        assert_eq!(hits("C1c2ccccc2-c2ccccc12", "[$([A;R][!a])]"), 0);
    }

    #[test]
    fn disconnected_patterns_need_distinct_atoms() {
        assert!(found("FC(F)(F)C(F)", "F.F.F.F"));
        assert!(!found("FC(F)F", "F.F.F.F"));
    }

    #[test]
    fn fused_polycycles() {
        assert!(found("c1ccc2cc3ccccc3cc2c1", "a21aa3a(aa1aaaa2)aaaa3"));
        assert!(!found("c1ccc2ccccc2c1", "a21aa3a(aa1aaaa2)aaaa3"));
    }
}

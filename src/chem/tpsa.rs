//! Topological polar surface area (Ertl, Rohde and Selzer).
//!
//! Only nitrogen and oxygen contribute. Each atom's environment (heavy
//! neighbours, hydrogens, charge, bond-type counts and three-ring
//! membership) is matched against the rule table in order; the first match
//! wins. Unmatched atoms use the per-element fallback formula, clamped at
//! zero.

use super::params::{Parameters, TpsaRule};
use super::{heavy_neighbors, total_hydrogens};
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Environment {
    neighbors: usize,
    hydrogens: usize,
    charge: i8,
    single: usize,
    double: usize,
    triple: usize,
    aromatic: usize,
    three_ring: bool,
}

impl Environment {
    fn of(mol: &Molecule, idx: usize) -> Self {
        let mut env = Environment {
            hydrogens: total_hydrogens(mol, idx),
            charge: mol.atoms[idx].charge,
            three_ring: mol.rings().is_atom_in_ring_of_size(idx, 3),
            ..Default::default()
        };
        for (_, order) in heavy_neighbors(mol, idx) {
            env.neighbors += 1;
            match order {
                BondOrder::Single => env.single += 1,
                BondOrder::Double => env.double += 1,
                BondOrder::Triple => env.triple += 1,
                BondOrder::Aromatic => env.aromatic += 1,
                BondOrder::Quadruple => {}
            }
        }
        env
    }

    fn matches(&self, rule: &TpsaRule) -> bool {
        fn field<T: PartialEq>(expected: Option<T>, actual: T) -> bool {
            expected.is_none_or(|e| e == actual)
        }
        field(rule.neighbors, self.neighbors)
            && field(rule.hydrogens.map(usize::from), self.hydrogens)
            && field(rule.charge, self.charge)
            && field(rule.single, self.single)
            && field(rule.double, self.double)
            && field(rule.triple, self.triple)
            && field(rule.aromatic, self.aromatic)
            && field(rule.three_ring, self.three_ring)
    }
}

/// Sum of the N and O contributions.
pub fn tpsa(mol: &Molecule, params: &Parameters) -> f64 {
    (0..mol.atom_count())
        .map(|idx| atom_contribution(mol, idx, params))
        .sum()
}

pub fn atom_contribution(mol: &Molecule, idx: usize, params: &Parameters) -> f64 {
    let key = match mol.atoms[idx].element {
        Element::N => "N",
        Element::O => "O",
        _ => return 0.0,
    };
    let env = Environment::of(mol, idx);

    let rule = params
        .tpsa
        .rules
        .iter()
        .filter(|r| r.element == key)
        .find(|r| env.matches(r));
    if let Some(rule) = rule {
        return rule.value;
    }

    match params.tpsa.fallback.get(key) {
        Some(f) => {
            let value = f.base + f.per_neighbor * env.neighbors as f64 + f.per_hydrogen * env.hydrogens as f64;
            value.max(0.0)
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::params::get_default_parameters;
    use crate::smiles::parse;

    fn psa(smiles: &str) -> f64 {
        tpsa(&parse(smiles).unwrap(), get_default_parameters())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn hydrocarbons_have_no_polar_area() {
        assert_close(psa("c1ccccc1"), 0.0);
        assert_close(psa("CCCC"), 0.0);
    }

    #[test]
    fn common_oxygen_environments() {
        assert_close(psa("CCO"), 20.23);
        assert_close(psa("CC(=O)O"), 37.3);
        assert_close(psa("COC"), 9.23);
        assert_close(psa("C1CO1"), 12.53);
        assert_close(psa("c1ccoc1"), 13.14);
    }

    #[test]
    fn common_nitrogen_environments() {
        assert_close(psa("c1ccncc1"), 12.89);
        assert_close(psa("c1cc[nH]c1"), 15.79);
        assert_close(psa("CC#N"), 23.79);
        assert_close(psa("CN"), 26.02);
        assert_close(psa("CN(C)C"), 3.24);
        assert_close(psa("C[N+](=O)[O-]"), 3.01 + 17.07 + 23.06);
    }

    #[test]
    fn sulfur_and_phosphorus_are_ignored() {
        assert_close(psa("CSC"), 0.0);
        assert_close(psa("CP(C)C"), 0.0);
    }

    #[test]
    fn unmatched_environments_use_fallback() {
        // Water: 28.5 + 1.5 * 2
        assert_close(psa("O"), 31.5);
        // Ammonia: 30.5 + 1.5 * 3
        assert_close(psa("N"), 35.0);
    }
}

//! Quantitative estimate of drug-likeness (Bickerton et al., 2012).
//!
//! Eight properties are mapped through asymmetric double sigmoid
//! desirability functions and combined as a weighted geometric mean. The
//! curve parameters and weights come from [`Parameters`].

use super::alerts::{self, STRUCTURAL_ALERT_SMARTS};
use super::params::Parameters;
use super::{crippen, lipinski, tpsa, weight};
use crate::model::molecule::Molecule;
use crate::perception::rings;
use crate::smarts;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QedProperties {
    pub mw: f64,
    pub alogp: f64,
    pub hba: u32,
    pub hbd: u32,
    pub psa: f64,
    pub rotb: u32,
    pub arom: u32,
    pub alerts: u32,
}

impl QedProperties {
    pub fn of(mol: &Molecule, params: &Parameters) -> Self {
        Self {
            mw: weight::mol_weight(mol),
            alogp: crippen::contributions(mol, params).0,
            hba: num_acceptors(mol),
            hbd: lipinski::num_hbd(mol),
            psa: tpsa::tpsa(mol, params),
            rotb: lipinski::num_rotatable_bonds(mol),
            arom: num_aromatic_rings(mol),
            alerts: matched_alerts(mol).len() as u32,
        }
    }

    fn as_array(&self) -> [f64; 8] {
        [
            self.mw,
            self.alogp,
            self.hba as f64,
            self.hbd as f64,
            self.psa,
            self.rotb as f64,
            self.arom as f64,
            self.alerts as f64,
        ]
    }
}

pub fn qed(mol: &Molecule, params: &Parameters) -> f64 {
    score(&QedProperties::of(mol, params), params)
}

/// Weighted geometric mean of the desirabilities.
pub fn score(props: &QedProperties, params: &Parameters) -> f64 {
    let qed = &params.qed;
    let curves = [
        qed.mw, qed.alogp, qed.hba, qed.hbd, qed.psa, qed.rotb, qed.arom, qed.alerts,
    ];
    let weights = qed.weights.as_array();

    let mut total = 0.0;
    for ((curve, weight), x) in curves.iter().zip(weights).zip(props.as_array()) {
        total += weight * curve.evaluate(x).ln();
    }
    (total / weights.iter().sum::<f64>()).exp()
}

/// Distinct acceptor matches summed over the acceptor patterns.
pub fn num_acceptors(mol: &Molecule) -> u32 {
    alerts::qed_patterns()
        .acceptors
        .iter()
        .map(|p| smarts::match_count(mol, p) as u32)
        .sum()
}

/// Rings left after deleting aliphatic ring atoms that touch a
/// non-aromatic atom.
pub fn num_aromatic_rings(mol: &Molecule) -> u32 {
    let aliphatic = smarts::matched_atoms(mol, &alerts::qed_patterns().aliphatic_rings);
    let keep: Vec<bool> = aliphatic.iter().map(|deleted| !deleted).collect();
    rings::find_rings(&mol.subgraph(&keep)).num_rings() as u32
}

/// The structural alerts present in `mol`, as their SMARTS.
pub fn matched_alerts(mol: &Molecule) -> Vec<&'static str> {
    alerts::qed_patterns()
        .alerts
        .iter()
        .zip(STRUCTURAL_ALERT_SMARTS)
        .filter(|(pattern, _)| smarts::has_match(mol, pattern))
        .map(|(_, text)| text)
        .collect()
}

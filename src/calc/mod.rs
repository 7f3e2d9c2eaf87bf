//! The per-record descriptor calculator.
//!
//! [`calculate`] parses one input record through a [`Toolkit`] and produces
//! a [`Descriptors`] row. Floating-point columns are rounded when the row is
//! built, so the values held by a `Descriptors` are exactly the values
//! written.

mod error;
mod format;

pub use error::Error;
pub use format::{format_float, round_to};

use crate::io::InputRecord;
use crate::toolkit::Toolkit;
use std::fmt;

/// Names of the twelve descriptor columns, in output order.
pub const DESCRIPTOR_NAMES: [&str; 12] = [
    "HBA",
    "HBD",
    "complexity",
    "NumRings",
    "RTB",
    "TPSA",
    "logP",
    "MR",
    "MW",
    "Csp3",
    "fmf",
    "qed",
];

/// Header columns: the identifier followed by [`DESCRIPTOR_NAMES`].
pub fn header() -> Vec<&'static str> {
    std::iter::once("Name").chain(DESCRIPTOR_NAMES).collect()
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptors {
    pub name: String,
    pub hba: u32,
    pub hbd: u32,
    /// HBA + HBD.
    pub complexity: u32,
    pub num_rings: u32,
    pub rotatable_bonds: u32,
    pub tpsa: f64,
    pub logp: f64,
    pub mr: f64,
    pub mw: f64,
    pub csp3: f64,
    /// Heavy atoms in the Murcko scaffold over heavy atoms in the molecule.
    pub fmf: f64,
    pub qed: f64,
}

impl Descriptors {
    /// Formatted cells, identifier first.
    pub fn fields(&self) -> [String; 13] {
        [
            self.name.clone(),
            self.hba.to_string(),
            self.hbd.to_string(),
            self.complexity.to_string(),
            self.num_rings.to_string(),
            self.rotatable_bonds.to_string(),
            format_float(self.tpsa),
            format_float(self.logp),
            format_float(self.mr),
            format_float(self.mw),
            format_float(self.csp3),
            format_float(self.fmf),
            format_float(self.qed),
        ]
    }
}

impl fmt::Display for Descriptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields().join("\t"))
    }
}

/// Computes the descriptor row for `record`.
///
/// # Errors
///
/// * [`Error::Unparsable`] if the toolkit cannot parse the structure.
/// * [`Error::NoHeavyAtoms`] if the parsed molecule has no heavy atoms.
pub fn calculate<T: Toolkit>(toolkit: &T, record: &InputRecord) -> Result<Descriptors, Error> {
    let mol = toolkit
        .parse(&record.smiles)
        .map_err(|e| Error::Unparsable {
            line: record.line,
            smiles: record.smiles.clone(),
            name: record.name.clone(),
            source: Box::new(e),
        })?;

    let heavy_atoms = toolkit.num_heavy_atoms(&mol);
    if heavy_atoms == 0 {
        return Err(Error::NoHeavyAtoms {
            line: record.line,
            smiles: record.smiles.clone(),
            name: record.name.clone(),
        });
    }

    let hba = toolkit.num_hba(&mol);
    let hbd = toolkit.num_hbd(&mol);
    let (logp, mr) = toolkit.crippen(&mol);
    let scaffold = toolkit.murcko_scaffold(&mol);
    let fmf = toolkit.num_heavy_atoms(&scaffold) as f64 / heavy_atoms as f64;

    Ok(Descriptors {
        name: record.name.clone(),
        hba,
        hbd,
        complexity: hba + hbd,
        num_rings: toolkit.num_rings(&mol),
        rotatable_bonds: toolkit.num_rotatable_bonds(&mol),
        tpsa: round_to(toolkit.tpsa(&mol), 2),
        logp: round_to(logp, 2),
        mr: round_to(mr, 2),
        mw: round_to(toolkit.mol_weight(&mol), 2),
        csp3: round_to(toolkit.fraction_csp3(&mol), 3),
        fmf: round_to(fmf, 3),
        qed: round_to(toolkit.qed(&mol), 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::Builtin;
    use pretty_assertions::assert_eq;

    fn record(smiles: &str, name: &str) -> InputRecord {
        InputRecord {
            line: 7,
            smiles: smiles.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn header_has_name_and_twelve_descriptors() {
        assert_eq!(
            header().join("\t"),
            "Name\tHBA\tHBD\tcomplexity\tNumRings\tRTB\tTPSA\tlogP\tMR\tMW\tCsp3\tfmf\tqed"
        );
    }

    #[test]
    fn benzene_row() {
        let row = calculate(&Builtin::new(), &record("c1ccccc1", "benzene")).unwrap();
        assert_eq!(
            row.to_string(),
            "benzene\t0\t0\t0\t1\t0\t0.0\t1.69\t26.44\t78.11\t0.0\t1.0\t0.443"
        );
    }

    #[test]
    fn ethanol_row() {
        let row = calculate(&Builtin::new(), &record("CCO", "ethanol")).unwrap();
        assert_eq!(
            row.to_string(),
            "ethanol\t1\t1\t2\t0\t0\t20.23\t-0.0\t12.76\t46.07\t1.0\t0.0\t0.407"
        );
    }

    #[test]
    fn toluene_fractions() {
        let row = calculate(&Builtin::new(), &record("Cc1ccccc1", "toluene")).unwrap();
        assert_eq!(row.csp3, 0.143);
        assert_eq!(row.fmf, 0.857);
        assert_eq!(row.mw, 92.14);
    }

    #[test]
    fn unparsable_structure_reports_diagnostic() {
        let err = calculate(&Builtin::new(), &record("C1CC", "broken")).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.line(), 7);
        assert_eq!(err.to_string(), "smiles C1CC cannot be parsed (broken)");
    }

    #[test]
    fn molecule_without_heavy_atoms_is_fatal() {
        for smiles in ["", "[H][H]"] {
            let err = calculate(&Builtin::new(), &record(smiles, "h2")).unwrap_err();
            assert!(matches!(err, Error::NoHeavyAtoms { line: 7, .. }));
            assert!(!err.is_recoverable());
        }
    }
}

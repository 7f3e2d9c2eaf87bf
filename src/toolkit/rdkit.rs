use std::collections::HashMap;

use ::rdkit::{Properties, ROMol};
use thiserror::Error;

use super::Toolkit;
use crate::chem::{self, Parameters};
use crate::chem::qed::QedProperties;
use crate::model::molecule::Molecule;
use crate::smiles;

// Keys of `Properties::compute_properties`.
const NUM_HBA: &str = "NumHBA";
const NUM_HBD: &str = "NumHBD";
const NUM_RINGS: &str = "NumRings";
const NUM_ROTATABLE_BONDS: &str = "NumRotatableBonds";
const TPSA: &str = "tpsa";
const CRIPPEN_LOGP: &str = "CrippenClogP";
const CRIPPEN_MR: &str = "CrippenMR";
const AVERAGE_MW: &str = "amw";
const FRACTION_CSP3: &str = "FractionCSP3";

#[derive(Debug, Error)]
pub enum Error {
    #[error("RDKit could not parse '{smiles}'")]
    Rejected { smiles: String },

    #[error("RDKit SMILES '{smiles}' could not be read back: {source}")]
    Graph {
        smiles: String,
        #[source]
        source: smiles::Error,
    },
}

/// A molecule parsed by RDKit: its computed property table plus the graph
/// of its RDKit SMILES, which carries the scaffold and the QED substructure
/// queries.
#[derive(Debug, Clone)]
pub struct RdkitMolecule {
    properties: HashMap<String, f64>,
    graph: Molecule,
}

impl RdkitMolecule {
    fn property(&self, key: &str) -> f64 {
        self.properties.get(key).copied().unwrap_or(0.0)
    }

    fn count(&self, key: &str) -> u32 {
        self.property(key).round() as u32
    }

    pub fn graph(&self) -> &Molecule {
        &self.graph
    }
}

/// Toolkit over the RDKit bindings.
#[derive(Debug, Clone)]
pub struct Rdkit {
    params: Parameters,
}

impl Rdkit {
    pub fn new() -> Self {
        Self::with_parameters(chem::get_default_parameters().clone())
    }

    /// Only the QED curves and weights of `params` apply; RDKit owns the
    /// Crippen and TPSA tables.
    pub fn with_parameters(params: Parameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }
}

impl Default for Rdkit {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit for Rdkit {
    type Molecule = RdkitMolecule;
    type ParseError = Error;

    fn parse(&self, smiles: &str) -> Result<RdkitMolecule, Error> {
        let mol = ROMol::from_smile(smiles).map_err(|_| Error::Rejected {
            smiles: smiles.to_string(),
        })?;
        let properties = Properties::new().compute_properties(&mol);
        let written = mol.as_smiles();
        let graph = smiles::parse(&written).map_err(|source| Error::Graph {
            smiles: written.clone(),
            source,
        })?;
        Ok(RdkitMolecule { properties, graph })
    }

    fn num_hba(&self, mol: &RdkitMolecule) -> u32 {
        mol.count(NUM_HBA)
    }

    fn num_hbd(&self, mol: &RdkitMolecule) -> u32 {
        mol.count(NUM_HBD)
    }

    fn num_rings(&self, mol: &RdkitMolecule) -> u32 {
        mol.count(NUM_RINGS)
    }

    fn num_rotatable_bonds(&self, mol: &RdkitMolecule) -> u32 {
        mol.count(NUM_ROTATABLE_BONDS)
    }

    fn tpsa(&self, mol: &RdkitMolecule) -> f64 {
        mol.property(TPSA)
    }

    fn crippen(&self, mol: &RdkitMolecule) -> (f64, f64) {
        (mol.property(CRIPPEN_LOGP), mol.property(CRIPPEN_MR))
    }

    fn mol_weight(&self, mol: &RdkitMolecule) -> f64 {
        mol.property(AVERAGE_MW)
    }

    fn fraction_csp3(&self, mol: &RdkitMolecule) -> f64 {
        mol.property(FRACTION_CSP3)
    }

    fn num_heavy_atoms(&self, mol: &RdkitMolecule) -> usize {
        mol.graph.heavy_atom_count()
    }

    /// The scaffold keeps no property table; only its heavy atoms are read.
    fn murcko_scaffold(&self, mol: &RdkitMolecule) -> RdkitMolecule {
        RdkitMolecule {
            properties: HashMap::new(),
            graph: chem::scaffold::murcko_scaffold(&mol.graph),
        }
    }

    fn qed(&self, mol: &RdkitMolecule) -> f64 {
        let props = QedProperties {
            mw: mol.property(AVERAGE_MW),
            alogp: mol.property(CRIPPEN_LOGP),
            hba: chem::qed::num_acceptors(&mol.graph),
            hbd: mol.count(NUM_HBD),
            psa: mol.property(TPSA),
            rotb: mol.count(NUM_ROTATABLE_BONDS),
            arom: chem::qed::num_aromatic_rings(&mol.graph),
            alerts: chem::qed::matched_alerts(&mol.graph).len() as u32,
        };
        chem::qed::score(&props, &self.params)
    }
}

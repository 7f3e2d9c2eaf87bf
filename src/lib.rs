//! A pure Rust library and batch tool for physicochemical descriptors of
//! molecules given as SMILES.
//!
//! For every input structure it computes twelve descriptors: hydrogen-bond
//! acceptor and donor counts and their sum, ring count, rotatable bonds,
//! topological polar surface area, Crippen logP and molar refractivity,
//! molecular weight, fraction of sp3 carbons, fraction of heavy atoms in the
//! Murcko scaffold, and QED drug-likeness. Batches are processed by an
//! ordered parallel map, so the output table follows the input order no
//! matter how many workers run.
//!
//! # Features
//!
//! - **SMILES parsing** — OpenSMILES subset with sanitization: hydrogen
//!   folding, implicit hydrogens, valence and kekulization checks, SSSR and
//!   Hückel aromaticity perception
//! - **Descriptors** — Lipinski counts, strict rotatable bonds, Ertl TPSA,
//!   Wildman–Crippen logP/MR, Bemis–Murcko scaffolds and QED, with numeric
//!   tables loaded from TOML
//! - **Batch processing** — windowed line reader, worker pool with bounded
//!   channels, in-order TSV writer
//!
//! # Quick Start
//!
//! ```
//! use physchem::{Builtin, InputRecord, calculate};
//!
//! let toolkit = Builtin::new();
//! let record = InputRecord {
//!     line: 1,
//!     smiles: "c1ccccc1".to_string(),
//!     name: "benzene".to_string(),
//! };
//!
//! let row = calculate(&toolkit, &record)?;
//! assert_eq!(row.num_rings, 1);
//! assert_eq!(row.hba + row.hbd, 0);
//! assert_eq!(row.mw, 78.11);
//! assert_eq!(row.fmf, 1.0);
//! assert_eq!(
//!     row.to_string(),
//!     "benzene\t0\t0\t0\t1\t0\t0.0\t1.69\t26.44\t78.11\t0.0\t1.0\t0.443"
//! );
//! # Ok::<(), physchem::CalcError>(())
//! ```
//!
//! Whole files go through [`dispatch::run`], which pairs a [`SmiReader`] with
//! a [`TableWriter`]:
//!
//! ```
//! use physchem::dispatch::{self, DispatchConfig, PoolConfig, Silent};
//! use physchem::{Builtin, ReadOptions, SmiReader, TableWriter};
//!
//! let input = "CCO\tethanol\nC1CC\tbroken\nc1ccccc1\tbenzene\n";
//! let reader = SmiReader::new(input.as_bytes(), ReadOptions::default());
//! let mut table = TableWriter::new(Vec::new())?;
//! let config = DispatchConfig {
//!     pool: PoolConfig { workers: 2, chunk_size: 100 },
//!     progress_interval: None,
//! };
//!
//! let summary = dispatch::run(&Builtin::new(), reader, &config, &mut table, &mut Silent)?;
//! assert_eq!((summary.processed, summary.written, summary.unparsable), (3, 2, 1));
//!
//! let text = String::from_utf8(table.finish()?)?;
//! assert!(text.lines().nth(1).unwrap().starts_with("ethanol\t1\t1\t2\t"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`smiles`] — SMILES parser and sanitization
//! - [`smarts`] — SMARTS substructure queries
//! - [`chem`] — Descriptor algorithms, QED substructure alerts and parameter tables
//! - [`toolkit`] — The [`Toolkit`] seam and the bundled [`Builtin`] implementation
//! - [`calc`] — Per-record calculator and row formatting
//! - [`io`] — Windowed SMILES reader and TSV writer
//! - [`dispatch`] — Ordered worker pool and batch driver
//!
//! # Data Types
//!
//! - [`Molecule`] — Heavy-atom graph with per-atom hydrogen counts and ring information
//! - [`Atom`] — Element, charge, isotope, aromaticity and hydrogen count
//! - [`Bond`] — Bond between two atoms with bond order
//! - [`Element`] — Chemical element (wildcard, H through Og)
//! - [`BondOrder`] — Single, Double, Triple, Quadruple or Aromatic
//! - [`Descriptors`] — One output row

mod model;
mod perception;

pub mod calc;
pub mod chem;
pub mod dispatch;
pub mod io;
pub mod smarts;
pub mod smiles;
pub mod toolkit;

pub use model::atom::Atom;
pub use model::molecule::{Bond, Molecule};
pub use model::rings::RingInfo;
pub use model::types::{BondOrder, Element, ParseElementError};

pub use calc::{DESCRIPTOR_NAMES, Descriptors, calculate};
pub use chem::Parameters;
pub use io::{InputRecord, ReadOptions, SmiReader, TableWriter};
pub use toolkit::{Builtin, Toolkit};

pub use calc::Error as CalcError;
pub use chem::Error as ParameterError;
pub use dispatch::Error as DispatchError;
pub use io::Error as IoError;
pub use smarts::Error as SmartsError;
pub use smiles::Error as SmilesError;

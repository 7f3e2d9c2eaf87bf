//! Line-oriented SMILES input and tab-separated output.
//!
//! [`SmiReader`] turns a buffered reader into a lazy stream of
//! [`InputRecord`]s restricted to a window of lines; [`TableWriter`] writes
//! the descriptor table.

use std::fmt;

pub mod error;
pub mod smi;
pub mod table;

pub use error::Error;
pub use smi::{InputRecord, ReadOptions, SmiReader};
pub use table::TableWriter;

/// File formats handled by this crate, used to tag parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Line-delimited SMILES with an optional identifier field.
    Smiles,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Smiles => write!(f, "SMILES"),
        }
    }
}

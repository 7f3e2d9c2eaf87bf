use thiserror::Error;

/// Errors raised while computing one record's descriptors.
#[derive(Debug, Error)]
pub enum Error {
    /// The toolkit rejected the structure. The message is the diagnostic
    /// line reported for skipped records.
    #[error("smiles {smiles} cannot be parsed ({name})")]
    Unparsable {
        line: usize,
        smiles: String,
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The molecule has no heavy atoms, so the scaffold fraction is a
    /// division by zero.
    #[error("molecule '{name}' (line {line}, smiles '{smiles}') has no heavy atoms; the scaffold fraction is undefined")]
    NoHeavyAtoms {
        line: usize,
        smiles: String,
        name: String,
    },
}

impl Error {
    /// Unparsable records are skipped; everything else stops the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Unparsable { .. })
    }

    pub fn line(&self) -> usize {
        match self {
            Error::Unparsable { line, .. } | Error::NoHeavyAtoms { line, .. } => *line,
        }
    }
}

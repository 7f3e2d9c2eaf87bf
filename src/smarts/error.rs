use thiserror::Error;

/// Errors raised while compiling a SMARTS pattern.
///
/// Positions are zero-based byte offsets into the pattern string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unexpected character '{ch}' at position {position} in SMARTS")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unexpected end of SMARTS inside {context}")]
    UnexpectedEnd { context: &'static str },

    #[error("unknown element '{symbol}' at position {position} in SMARTS")]
    UnknownElement { symbol: String, position: usize },

    #[error("unbalanced parenthesis at position {position} in SMARTS")]
    UnbalancedBranch { position: usize },

    #[error("dangling bond at position {position} in SMARTS")]
    DanglingBond { position: usize },

    #[error("ring bond {label} is opened but never closed in SMARTS")]
    UnclosedRing { label: u16 },
}

impl Error {
    pub(crate) fn unexpected(ch: char, position: usize) -> Self {
        Self::UnexpectedCharacter { ch, position }
    }
}

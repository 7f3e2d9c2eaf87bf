//! Error types for the built-in descriptor toolkit.

use thiserror::Error;

/// Errors raised while loading descriptor parameter tables.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse the parameter TOML.
    #[error("failed to parse descriptor parameters: {0}")]
    ParameterParse(#[from] toml::de::Error),

    /// A parameter table parsed but holds an unusable value.
    ///
    /// Occurs when a TPSA rule names an element other than N or O, a
    /// fallback is missing for N or O, or a QED weight or scale is not
    /// positive.
    #[error("invalid descriptor parameter in [{section}]: {detail}")]
    InvalidParameter {
        /// Table containing the offending entry.
        section: &'static str,
        /// Description of the problem.
        detail: String,
    },
}

impl Error {
    pub(crate) fn invalid(section: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            section,
            detail: detail.into(),
        }
    }
}

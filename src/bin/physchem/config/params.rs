use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use physchem::chem;

#[cfg(not(feature = "rdkit"))]
pub type Engine = physchem::Builtin;
#[cfg(feature = "rdkit")]
pub type Engine = physchem::toolkit::Rdkit;

/// Builds the toolkit from the embedded tables or a user-supplied TOML file.
pub fn build_toolkit(params: Option<&Path>) -> Result<Engine> {
    let Some(path) = params else {
        return Ok(Engine::new());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
    let params = chem::load_parameters(Some(&text))
        .with_context(|| format!("Invalid parameter file: {}", path.display()))?;
    Ok(Engine::with_parameters(params))
}

//! Graph perception run during SMILES sanitization.
//!
//! - [`rings`] – Ring bonds, cyclomatic number and the SSSR.
//! - [`kekule`] – Kekulé feasibility of aromatic input.
//! - [`aromaticity`] – Hückel aromaticity for rings written in Kekulé form.

pub mod aromaticity;
pub mod kekule;
pub mod rings;

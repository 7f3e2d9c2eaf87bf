//! Molecular graph types shared by the parser, perception and descriptor code.
//!
//! - [`types`] – Elements and bond orders.
//! - [`atom`] – Atoms with charge, aromaticity and hydrogen count.
//! - [`molecule`] – The molecular graph with adjacency and cached ring data.
//! - [`rings`] – Ring membership produced by perception.

pub mod atom;
pub mod molecule;
pub mod rings;
pub mod types;

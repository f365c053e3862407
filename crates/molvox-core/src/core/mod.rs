//! # Core Module
//!
//! Stateless building blocks: the data models that describe atoms and grids,
//! and the file I/O around them.
//!
//! - **Molecular and Grid Representation** ([`models`]) - Elements, atoms, bounding boxes, occupancy grids
//! - **File I/O** ([`io`]) - PDB and MOL2 readers, NumPy and CSV writers

pub mod io;
pub mod models;

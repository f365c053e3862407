//! # Core Models Module
//!
//! This module contains the data structures used to describe a molecule to the
//! voxelizer and the grid it produces.
//!
//! ## Key Components
//!
//! - [`element`] - Chemical element symbols, parsing, and per-element display colours
//! - [`atom`] - An atom reduced to what voxelization needs: a position and an element
//! - [`bounds`] - The axis-aligned bounding box of a set of atoms
//! - [`grid`] - The dense `(x, y, z, channel)` binary occupancy grid
//!
//! ## Usage
//!
//! ```ignore
//! use molvox::core::models::{atom::Atom, element::Element};
//!
//! let atoms = vec![
//!     Atom::at(Element::C, 0.0, 0.0, 0.0),
//!     Atom::at(Element::N, 2.2, 0.0, 0.0),
//! ];
//! let grid = molvox::engine::voxelizer::build(&atoms, &[Element::C, Element::N], 1.0)?;
//! assert_eq!(grid.shape(), [4, 1, 1, 2]);
//! ```

pub mod atom;
pub mod bounds;
pub mod element;
pub mod grid;

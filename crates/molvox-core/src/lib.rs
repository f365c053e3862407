//! # molvox Core Library
//!
//! Converts molecular structures into multi-channel binary voxel grids, one
//! channel per tracked chemical element, ready to feed a 3D convolutional
//! network.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Element`,
//!   `BoundingBox`, `VoxelGrid`) and I/O for structure files and grid output.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error taxonomy, and
//!   `VoxelGridBuilder`, which performs the binning.
//!
//! - **[`workflows`]: The Public API.** Complete procedures that read a
//!   structure file, voxelize it, and summarize the result, for one file or a
//!   batch.

pub mod core;
pub mod engine;
pub mod workflows;

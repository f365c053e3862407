//! # Workflows Module
//!
//! High-level entry points that tie file I/O and the engine together.
//!
//! - **Voxelization Workflow** ([`voxelize`]) - Read a structure, build its grid,
//!   and summarize per-channel occupancy, for a single file or a batch.
//! - **Inspection Workflow** ([`inspect`]) - Report atom counts, extent, and the
//!   grid shape a configuration would produce, without allocating the grid.

pub mod inspect;
pub mod voxelize;

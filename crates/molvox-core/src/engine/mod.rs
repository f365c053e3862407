//! # Engine Module
//!
//! This module implements voxelization proper: turning a list of atoms into a
//! multi-channel occupancy grid.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tracked elements, voxel size, and their validation
//! - **Grid Construction** ([`voxelizer`]) - The `VoxelGridBuilder` binning algorithm
//! - **Progress Monitoring** ([`progress`]) - Progress events for long batch runs
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Grid construction is a pure function of its inputs. With the `parallel`
//! feature the per-atom cell lookup runs on the rayon thread pool; the grid
//! itself is always written sequentially, so results are identical either way.

pub mod config;
pub mod error;
pub mod progress;
pub mod voxelizer;

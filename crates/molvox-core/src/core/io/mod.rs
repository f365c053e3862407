//! Provides input/output functionality for structure files and voxel grids.
//!
//! Readers extract atom positions and elements from molecular structure
//! formats behind the [`traits::StructureFile`] interface. Writers persist a
//! finished grid as a NumPy array or export its occupied cells for
//! visualization.

pub mod format;
pub mod mol2;
pub mod npy;
pub mod pdb;
pub mod traits;
pub mod voxels;

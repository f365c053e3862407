use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VoxelError {
    #[error("Cannot voxelize an empty atom list: no bounding box is definable")]
    EmptyInput,

    #[error("Invalid voxelization configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Atom at index {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error(
        "Grid for an extent of {extent:?} Angstroms at voxel size {voxel_size} does not fit in memory"
    )]
    GridTooLarge { extent: [f64; 3], voxel_size: f64 },
}

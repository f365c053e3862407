use super::voxelize::{WorkflowError, count_elements};
use crate::core::io::format::read_atoms;
use crate::core::models::bounds::BoundingBox;
use crate::core::models::element::Element;
use crate::engine::config::VoxelizationConfig;
use crate::engine::error::VoxelError;
use crate::engine::voxelizer::VoxelGridBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What a structure looks like to the voxelizer, without building the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureInspection {
    pub source: PathBuf,
    pub total_atoms: usize,
    pub element_counts: BTreeMap<Element, usize>,
    pub bounds: BoundingBox,
    /// `[nx, ny, nz, n_channels]` the current configuration would produce.
    pub grid_shape: [usize; 4],
}

impl StructureInspection {
    /// Bytes the dense grid would occupy. `run` only returns shapes whose
    /// length fits in memory, so the product cannot overflow.
    pub fn grid_bytes(&self) -> usize {
        self.grid_shape.iter().product()
    }
}

#[instrument(skip_all, name = "inspect_workflow", fields(path = %path.display()))]
pub fn run(path: &Path, config: &VoxelizationConfig) -> Result<StructureInspection, WorkflowError> {
    config.validate()?;
    let atoms = read_atoms(path).map_err(|source| WorkflowError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let bounds = BoundingBox::from_atoms(&atoms).ok_or_else(|| WorkflowError::Voxelize {
        path: path.to_path_buf(),
        source: VoxelError::EmptyInput,
    })?;
    let grid_shape = VoxelGridBuilder::from_config(config)
        .grid_shape(&bounds)
        .map_err(|source| WorkflowError::Voxelize {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(StructureInspection {
        source: path.to_path_buf(),
        total_atoms: atoms.len(),
        element_counts: count_elements(&atoms),
        bounds,
        grid_shape,
    })
}

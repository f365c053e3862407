use super::config::{VoxelizationConfig, validate_tracked_elements, validate_voxel_size};
use super::error::VoxelError;
use crate::core::models::atom::Atom;
use crate::core::models::bounds::BoundingBox;
use crate::core::models::element::Element;
use crate::core::models::grid::{VoxelGrid, grid_len};
use nalgebra::Point3;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Maps atoms into a multi-channel binary occupancy grid.
///
/// The builder only holds configuration; every call to [`build`](Self::build)
/// is an independent pure computation, so one builder can be shared freely
/// between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGridBuilder {
    tracked_elements: Vec<Element>,
    voxel_size: f64,
}

impl VoxelGridBuilder {
    /// Creates a builder. The configuration is validated by `build`, not here.
    ///
    /// # Arguments
    ///
    /// * `tracked_elements` - One channel per element, in this order.
    /// * `voxel_size` - Edge length of one cell in Angstroms.
    pub fn new(tracked_elements: Vec<Element>, voxel_size: f64) -> Self {
        Self {
            tracked_elements,
            voxel_size,
        }
    }

    pub fn from_config(config: &VoxelizationConfig) -> Self {
        Self::new(config.tracked_elements.clone(), config.voxel_size)
    }

    pub fn tracked_elements(&self) -> &[Element] {
        &self.tracked_elements
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Cells per spatial axis for a bounding box:
    /// `ceil((max - min) / voxel_size) + 1`.
    ///
    /// The extra cell keeps the far corner of the box representable.
    ///
    /// # Errors
    ///
    /// [`VoxelError::GridTooLarge`] if an axis count is not representable.
    pub fn grid_dims(&self, bounds: &BoundingBox) -> Result<[usize; 3], VoxelError> {
        let size = bounds.size();
        let mut dims = [0; 3];
        for (axis, n) in dims.iter_mut().enumerate() {
            let cells = (size[axis] / self.voxel_size).ceil();
            if !cells.is_finite() || cells >= usize::MAX as f64 {
                return Err(self.too_large(bounds));
            }
            *n = (cells as usize)
                .checked_add(1)
                .ok_or_else(|| self.too_large(bounds))?;
        }
        Ok(dims)
    }

    /// Full `[nx, ny, nz, n_channels]` shape, checked against the largest
    /// buffer a grid can hold.
    pub fn grid_shape(&self, bounds: &BoundingBox) -> Result<[usize; 4], VoxelError> {
        let [nx, ny, nz] = self.grid_dims(bounds)?;
        let channels = self.tracked_elements.len();
        grid_len([nx, ny, nz], channels).ok_or_else(|| self.too_large(bounds))?;
        Ok([nx, ny, nz, channels])
    }

    fn too_large(&self, bounds: &BoundingBox) -> VoxelError {
        let size = bounds.size();
        VoxelError::GridTooLarge {
            extent: [size.x, size.y, size.z],
            voxel_size: self.voxel_size,
        }
    }

    /// Cell containing `position`, clamped into the grid so that rounding at
    /// the max corner can never index out of range.
    fn cell_index(&self, position: &Point3<f64>, min: &Point3<f64>, dims: [usize; 3]) -> [usize; 3] {
        [0, 1, 2].map(|axis| {
            let raw = ((position[axis] - min[axis]) / self.voxel_size).floor();
            (raw.max(0.0) as usize).min(dims[axis] - 1)
        })
    }

    fn channel_of(&self, element: Element) -> Option<usize> {
        self.tracked_elements.iter().position(|&e| e == element)
    }

    /// Builds the occupancy grid for `atoms`.
    ///
    /// The bounding box spans all atoms, tracked or not. Each atom whose element
    /// is tracked sets its cell in that element's channel to 1; untracked atoms
    /// are skipped silently. The result does not depend on atom order.
    ///
    /// # Errors
    ///
    /// * [`VoxelError::InvalidConfig`] if the tracked set is empty, contains a
    ///   duplicate or `Unknown`, or the voxel size is not a positive finite number.
    /// * [`VoxelError::EmptyInput`] if `atoms` is empty.
    /// * [`VoxelError::NonFiniteCoordinate`] if any coordinate is NaN or infinite.
    /// * [`VoxelError::GridTooLarge`] if the grid for this extent and voxel
    ///   size cannot be addressed.
    ///
    /// All checks run before the grid is allocated.
    #[instrument(skip_all, name = "voxel_grid_build", fields(num_atoms = atoms.len()))]
    pub fn build(&self, atoms: &[Atom]) -> Result<VoxelGrid, VoxelError> {
        validate_tracked_elements(&self.tracked_elements)?;
        validate_voxel_size(self.voxel_size)?;

        if atoms.is_empty() {
            return Err(VoxelError::EmptyInput);
        }
        if let Some(index) = atoms
            .iter()
            .position(|a| !a.position.iter().all(|c| c.is_finite()))
        {
            return Err(VoxelError::NonFiniteCoordinate { index });
        }

        let bounds = BoundingBox::from_atoms(atoms).ok_or(VoxelError::EmptyInput)?;
        let [nx, ny, nz, _] = self.grid_shape(&bounds)?;
        let dims = [nx, ny, nz];
        debug!(?dims, min = ?bounds.min, max = ?bounds.max, "Computed grid extent.");

        let locate = |atom: &Atom| -> Option<([usize; 3], usize)> {
            let channel = self.channel_of(atom.element)?;
            Some((self.cell_index(&atom.position, &bounds.min, dims), channel))
        };

        #[cfg(not(feature = "parallel"))]
        let iterator = atoms.iter();

        #[cfg(feature = "parallel")]
        let iterator = atoms.par_iter();

        let hits: Vec<([usize; 3], usize)> = iterator.filter_map(locate).collect();
        let skipped = atoms.len() - hits.len();

        let too_large = self.too_large(&bounds);
        let mut grid = VoxelGrid::zeros(dims, self.tracked_elements.clone(), bounds, self.voxel_size)
            .ok_or(too_large)?;
        for (cell, channel) in hits {
            grid.mark(cell, channel);
        }

        info!(
            shape = ?grid.shape(),
            occupied = grid.total_occupied(),
            skipped_atoms = skipped,
            "Voxel grid built."
        );

        Ok(grid)
    }
}

/// Builds a grid in one call. See [`VoxelGridBuilder::build`].
pub fn build(
    atoms: &[Atom],
    tracked_elements: &[Element],
    voxel_size: f64,
) -> Result<VoxelGrid, VoxelError> {
    VoxelGridBuilder::new(tracked_elements.to_vec(), voxel_size).build(atoms)
}

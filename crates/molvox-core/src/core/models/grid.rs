use super::bounds::BoundingBox;
use super::element::Element;
use nalgebra::Point3;
use ndarray::{Array4, ShapeError};

/// A dense multi-channel binary occupancy grid.
///
/// Cells are indexed `(x, y, z, channel)` and stored in a flat row-major
/// buffer, channel fastest, so that the layout matches a C-ordered
/// `(nx, ny, nz, nc)` array. Every value is either 0 or 1.
///
/// Besides the data the grid records the bounding box origin, the voxel edge
/// length, and the ordered list of tracked elements it was built with, which
/// is what a caller needs to map cells back to real space.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    dims: [usize; 3],
    channels: Vec<Element>,
    bounds: BoundingBox,
    voxel_size: f64,
    data: Vec<u8>,
}

/// Buffer length for `dims` cells with `num_channels` channels each, or
/// `None` if it does not fit in a single allocation.
pub(crate) fn grid_len(dims: [usize; 3], num_channels: usize) -> Option<usize> {
    dims.iter()
        .try_fold(num_channels, |acc, &n| acc.checked_mul(n))
        .filter(|&len| len <= isize::MAX as usize)
}

impl VoxelGrid {
    /// Allocates an all-zero grid, or returns `None` if the buffer length
    /// overflows.
    pub(crate) fn zeros(
        dims: [usize; 3],
        channels: Vec<Element>,
        bounds: BoundingBox,
        voxel_size: f64,
    ) -> Option<Self> {
        let len = grid_len(dims, channels.len())?;
        Some(Self {
            dims,
            channels,
            bounds,
            voxel_size,
            data: vec![0; len],
        })
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize, channel: usize) -> usize {
        ((x * self.dims[1] + y) * self.dims[2] + z) * self.channels.len() + channel
    }

    #[inline]
    fn in_range(&self, x: usize, y: usize, z: usize, channel: usize) -> bool {
        x < self.dims[0] && y < self.dims[1] && z < self.dims[2] && channel < self.channels.len()
    }

    /// Marks a cell as occupied. Setting an already set cell is a no-op.
    pub(crate) fn mark(&mut self, [x, y, z]: [usize; 3], channel: usize) {
        debug_assert!(self.in_range(x, y, z, channel));
        let idx = self.offset(x, y, z, channel);
        self.data[idx] = 1;
    }

    /// Shape as `[nx, ny, nz, n_channels]`.
    pub fn shape(&self) -> [usize; 4] {
        [self.dims[0], self.dims[1], self.dims[2], self.channels.len()]
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Tracked elements in channel order.
    pub fn channels(&self) -> &[Element] {
        &self.channels
    }

    pub fn channel_of(&self, element: Element) -> Option<usize> {
        self.channels.iter().position(|&e| e == element)
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Raw buffer in `(x, y, z, channel)` row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize, z: usize, channel: usize) -> Option<u8> {
        if self.in_range(x, y, z, channel) {
            Some(self.data[self.offset(x, y, z, channel)])
        } else {
            None
        }
    }

    pub fn is_occupied(&self, x: usize, y: usize, z: usize, channel: usize) -> bool {
        self.get(x, y, z, channel) == Some(1)
    }

    /// Number of set cells in one channel. Returns 0 for an invalid channel.
    pub fn occupied_count(&self, channel: usize) -> usize {
        if channel >= self.channels.len() {
            return 0;
        }
        self.data
            .iter()
            .skip(channel)
            .step_by(self.channels.len())
            .filter(|&&v| v != 0)
            .count()
    }

    pub fn total_occupied(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Iterates over every set cell as `(x, y, z, channel)`, in buffer order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        let [_, ny, nz, nc] = self.shape();
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(move |(i, _)| {
                let channel = i % nc;
                let cell = i / nc;
                let z = cell % nz;
                let y = (cell / nz) % ny;
                let x = cell / (nz * ny);
                [x, y, z, channel]
            })
    }

    /// Real-space position of the low corner of a cell.
    pub fn cell_origin(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        let s = self.voxel_size;
        Point3::new(
            self.bounds.min.x + x as f64 * s,
            self.bounds.min.y + y as f64 * s,
            self.bounds.min.z + z as f64 * s,
        )
    }

    /// Real-space position of the centre of a cell.
    pub fn cell_center(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        let half = self.voxel_size / 2.0;
        self.cell_origin(x, y, z) + nalgebra::Vector3::repeat(half)
    }

    /// Copies the grid into an `(x, y, z, channel)` ndarray.
    pub fn to_array(&self) -> Result<Array4<u8>, ShapeError> {
        let [nx, ny, nz, nc] = self.shape();
        Array4::from_shape_vec((nx, ny, nz, nc), self.data.clone())
    }

    /// Copies the grid into a `(channel, x, y, z)` ndarray, the layout 3D
    /// convolution layers usually expect. Adding the batch axis is up to the
    /// caller.
    pub fn to_channels_first(&self) -> Result<Array4<u8>, ShapeError> {
        Ok(self
            .to_array()?
            .permuted_axes([3, 0, 1, 2])
            .as_standard_layout()
            .into_owned())
    }
}

use crate::core::models::grid::VoxelGrid;
use ndarray::ShapeError;
use ndarray_npy::{WriteNpyError, WriteNpyExt};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Axis order of the written array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridLayout {
    /// `(x, y, z, channel)`, the grid's native order.
    #[default]
    ChannelsLast,
    /// `(channel, x, y, z)`, as consumed by most 3D convolution layers.
    ChannelsFirst,
}

#[derive(Debug, Error)]
pub enum NpyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Grid buffer does not match its shape: {0}")]
    Shape(#[from] ShapeError),
    #[error("Failed to encode .npy array: {0}")]
    Encode(#[from] WriteNpyError),
}

/// Writes the grid as a `uint8` NumPy array.
pub fn write_to(grid: &VoxelGrid, layout: GridLayout, writer: impl Write) -> Result<(), NpyError> {
    let array = match layout {
        GridLayout::ChannelsLast => grid.to_array()?,
        GridLayout::ChannelsFirst => grid.to_channels_first()?,
    };
    array.write_npy(writer)?;
    Ok(())
}

pub fn write_to_path<P: AsRef<Path>>(
    grid: &VoxelGrid,
    layout: GridLayout,
    path: P,
) -> Result<(), NpyError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(grid, layout, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::engine::voxelizer;
    use ndarray::Array4;
    use ndarray_npy::read_npy;
    use tempfile::tempdir;

    fn sample_grid() -> VoxelGrid {
        let atoms = vec![
            Atom::at(Element::C, 0.0, 0.0, 0.0),
            Atom::at(Element::C, 0.5, 0.0, 0.0),
            Atom::at(Element::N, 2.2, 0.0, 0.0),
        ];
        voxelizer::build(&atoms, &[Element::C, Element::N], 1.0).unwrap()
    }

    #[test]
    fn channels_last_file_round_trips_through_numpy_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.npy");
        let grid = sample_grid();

        write_to_path(&grid, GridLayout::ChannelsLast, &path).unwrap();

        let array: Array4<u8> = read_npy(&path).unwrap();
        assert_eq!(array.shape(), &[4, 1, 1, 2]);
        assert_eq!(array[[0, 0, 0, 0]], 1);
        assert_eq!(array[[2, 0, 0, 1]], 1);
        assert_eq!(array.sum(), 2);
    }

    #[test]
    fn channels_first_file_has_channel_axis_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid_cf.npy");

        write_to_path(&sample_grid(), GridLayout::ChannelsFirst, &path).unwrap();

        let array: Array4<u8> = read_npy(&path).unwrap();
        assert_eq!(array.shape(), &[2, 4, 1, 1]);
        assert_eq!(array[[1, 2, 0, 0]], 1);
    }

    #[test]
    fn written_bytes_start_with_npy_magic() {
        let mut buffer = Vec::new();
        write_to(&sample_grid(), GridLayout::default(), &mut buffer).unwrap();
        assert_eq!(&buffer[..6], b"\x93NUMPY");
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("grid.npy");
        let result = write_to_path(&sample_grid(), GridLayout::ChannelsLast, path);
        assert!(matches!(result, Err(NpyError::Io(_))));
    }
}

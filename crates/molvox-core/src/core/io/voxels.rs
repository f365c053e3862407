//! Export of occupied voxels as a point list for visualization.
//!
//! Each occupied cell becomes one CSV row carrying its grid index, its centre
//! in real space, the element of its channel, and that element's fixed colour.

use crate::core::models::grid::VoxelGrid;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct OccupiedVoxelRecord {
    x: usize,
    y: usize,
    z: usize,
    channel: usize,
    element: &'static str,
    center_x: f64,
    center_y: f64,
    center_z: f64,
    r: u8,
    g: u8,
    b: u8,
}

/// Writes one row per occupied cell. Returns the number of rows written.
pub fn write_occupied_csv(grid: &VoxelGrid, writer: impl Write) -> Result<usize, csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for [x, y, z, channel] in grid.occupied_cells() {
        let element = grid.channels()[channel];
        let center = grid.cell_center(x, y, z);
        let [r, g, b] = element.color();
        wtr.serialize(OccupiedVoxelRecord {
            x,
            y,
            z,
            channel,
            element: element.symbol(),
            center_x: center.x,
            center_y: center.y,
            center_z: center.z,
            r,
            g,
            b,
        })?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}

pub fn write_occupied_csv_to_path<P: AsRef<Path>>(
    grid: &VoxelGrid,
    path: P,
) -> Result<usize, csv::Error> {
    let file = File::create(path)?;
    write_occupied_csv(grid, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::engine::voxelizer;
    use tempfile::tempdir;

    fn sample_grid() -> VoxelGrid {
        let atoms = vec![
            Atom::at(Element::C, 0.0, 0.0, 0.0),
            Atom::at(Element::N, 2.2, 0.0, 0.0),
            Atom::at(Element::H, 1.0, 0.0, 0.0),
        ];
        voxelizer::build(&atoms, &[Element::C, Element::N], 1.0).unwrap()
    }

    #[test]
    fn writes_header_and_one_row_per_occupied_cell() {
        let mut buffer = Vec::new();
        let rows = write_occupied_csv(&sample_grid(), &mut buffer).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "x,y,z,channel,element,center_x,center_y,center_z,r,g,b"
        );
        assert_eq!(lines[1], "0,0,0,0,C,0.5,0.5,0.5,144,144,144");
        assert_eq!(lines[2], "2,0,0,1,N,2.5,0.5,0.5,48,80,248");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn writes_to_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("voxels.csv");
        let rows = write_occupied_csv_to_path(&sample_grid(), &path).unwrap();
        assert_eq!(rows, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(",N,"));
    }
}

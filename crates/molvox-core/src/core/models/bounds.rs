use super::atom::Atom;
use nalgebra::{Point3, Vector3};

/// Axis-aligned box spanning a set of atom positions.
///
/// Always satisfies `min[i] <= max[i]` on every axis. A single atom (or a set
/// of coincident atoms) gives a degenerate box with `min == max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Computes the component-wise minimum and maximum over all atoms.
    ///
    /// Returns `None` for an empty slice, since no box is definable.
    pub fn from_atoms(atoms: &[Atom]) -> Option<Self> {
        Self::from_points(atoms.iter().map(|a| &a.position))
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Some(Self { min, max })
    }

    /// Edge lengths along x, y, z.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

use super::element::Element;
use nalgebra::Point3;

/// Represents an atom as consumed by the voxelizer.
///
/// Only the position and the element take part in grid construction. The
/// name is carried along from the structure file for logging and inspection
/// and is never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom as read from the file (e.g., "CA", "OG1").
    pub name: String,
    /// The chemical element of the atom.
    pub element: Element,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The chemical element.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: Element, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element,
            position,
        }
    }

    /// Creates an unnamed atom, convenient for building inputs by hand.
    pub fn at(element: Element, x: f64, y: f64, z: f64) -> Self {
        Self::new("", element, Point3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_keeps_all_fields() {
        let atom = Atom::new("CA", Element::C, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, Element::C);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn at_builds_unnamed_atom() {
        let atom = Atom::at(Element::N, -1.5, 0.0, 2.25);
        assert!(atom.name.is_empty());
        assert_eq!(atom.element, Element::N);
        assert_eq!(atom.position, Point3::new(-1.5, 0.0, 2.25));
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom1 = Atom::at(Element::O, 0.0, 0.0, 0.0);
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}

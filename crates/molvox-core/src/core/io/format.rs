use super::mol2::{Mol2Error, Mol2File};
use super::pdb::{PdbError, PdbFile};
use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structure formats the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Mol2,
}

#[derive(Debug, Error)]
pub enum StructureReadError {
    #[error("Unsupported structure format for '{}' (expected .pdb, .ent, or .mol2)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Pdb(#[from] PdbError),
    #[error(transparent)]
    Mol2(#[from] Mol2Error),
}

impl StructureFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdb" | "ent" => Some(Self::Pdb),
            "mol2" => Some(Self::Mol2),
            _ => None,
        }
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<Atom>, StructureReadError> {
        Ok(match self {
            Self::Pdb => PdbFile::read_from_path(path)?,
            Self::Mol2 => Mol2File::read_from_path(path)?,
        })
    }
}

/// Reads the atoms of a structure file, choosing the reader by extension.
pub fn read_atoms(path: &Path) -> Result<Vec<Atom>, StructureReadError> {
    let format = StructureFormat::from_path(path)
        .ok_or_else(|| StructureReadError::UnsupportedFormat(path.to_path_buf()))?;
    format.read_path(path)
}

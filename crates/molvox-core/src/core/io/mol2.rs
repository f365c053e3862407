use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Mol2Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: Mol2ParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum Mol2ParseErrorKind {
    #[error("ATOM line needs at least 6 fields (found {found})")]
    TooFewFields { found: usize },
    #[error("Invalid float for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
}

const ATOM_SECTION: &str = "@<TRIPOS>ATOM";
const SECTION_PREFIX: &str = "@<TRIPOS>";

/// Element of a SYBYL atom type: the part before the first `.`
/// (`"C.ar"` is carbon, `"N.pl3"` nitrogen). Dummy atoms and lone pairs map to
/// `Unknown`.
fn element_from_sybyl_type(sybyl_type: &str) -> Element {
    let symbol = sybyl_type.split('.').next().unwrap_or("");
    Element::from_symbol_lossy(symbol)
}

/// Reader for Tripos MOL2 files.
///
/// Only the `@<TRIPOS>ATOM` section of the first molecule is read.
pub struct Mol2File;

impl StructureFile for Mol2File {
    type Error = Mol2Error;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Atom>, Self::Error> {
        let mut atoms = Vec::new();
        let mut in_atom_section = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.starts_with(SECTION_PREFIX) {
                if in_atom_section {
                    break;
                }
                in_atom_section = trimmed == ATOM_SECTION;
                continue;
            }
            if !in_atom_section || trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 6 {
                return Err(Mol2Error::Parse {
                    line: line_num,
                    kind: Mol2ParseErrorKind::TooFewFields {
                        found: fields.len(),
                    },
                });
            }

            let parse = |idx: usize, field: &'static str| -> Result<f64, Mol2Error> {
                fields[idx].parse().map_err(|_| Mol2Error::Parse {
                    line: line_num,
                    kind: Mol2ParseErrorKind::InvalidFloat {
                        field,
                        value: fields[idx].to_string(),
                    },
                })
            };
            let position = Point3::new(parse(2, "x")?, parse(3, "y")?, parse(4, "z")?);

            atoms.push(Atom::new(
                fields[1],
                element_from_sybyl_type(fields[5]),
                position,
            ));
        }

        if atoms.is_empty() {
            return Err(Mol2Error::MissingRecord(ATOM_SECTION.into()));
        }
        Ok(atoms)
    }
}

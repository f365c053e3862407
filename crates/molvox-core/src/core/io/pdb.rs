use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coord(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Guesses the element from the raw 4-character atom name field.
///
/// Names whose first character sits in column 13 may carry a two-letter symbol
/// (`"CA  "` is calcium, `" CA "` is an alpha carbon). Leading digits as in
/// `"1HB "` are ignored.
fn element_from_atom_name(raw_name: &str) -> Element {
    let letters: String = raw_name
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    let left_aligned = raw_name.starts_with(|c: char| c.is_ascii_alphabetic());
    if left_aligned && letters.len() >= 2 {
        if let Ok(element) = letters[..2].parse() {
            return element;
        }
    }
    letters
        .get(..1)
        .map(Element::from_symbol_lossy)
        .unwrap_or(Element::Unknown)
}

/// Reader for the fixed-column Protein Data Bank format.
///
/// Reads `ATOM` and `HETATM` records of the first model. The element comes
/// from columns 77-78 and falls back to the atom name when those are blank.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Atom>, Self::Error> {
        let mut atoms = Vec::new();
        let mut inferred_elements = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let raw_name = line.get(12..16).unwrap_or("");
                    let x = parse_coord(&line, line_num, 30, 38)?;
                    let y = parse_coord(&line, line_num, 38, 46)?;
                    let z = parse_coord(&line, line_num, 46, 54)?;

                    let element_str = slice_and_trim(&line, 76, 78);
                    let element = if element_str.is_empty() {
                        inferred_elements += 1;
                        element_from_atom_name(raw_name)
                    } else {
                        Element::from_symbol_lossy(element_str)
                    };

                    atoms.push(Atom::new(raw_name.trim(), element, Point3::new(x, y, z)));
                }
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if atoms.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        if inferred_elements > 0 {
            debug!(
                count = inferred_elements,
                "Element column blank; inferred elements from atom names."
            );
        }
        Ok(atoms)
    }
}

use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A chemical element as it appears in structure files.
///
/// Only the elements commonly found in proteins, nucleic acids, ligands, and
/// bound ions are enumerated. Anything else read from a file becomes
/// [`Element::Unknown`], which can never be a tracked channel and is therefore
/// skipped during voxelization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Element {
    H,
    C,
    N,
    O,
    S,
    P,
    F,
    Cl,
    Br,
    I,
    Se,
    Na,
    K,
    Mg,
    Ca,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    /// Symbol not in the enumerated set.
    #[default]
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unrecognized element symbol: '{0}'")]
pub struct ParseElementError(pub String);

static ELEMENT_SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "D" => Element::H,
    "C" => Element::C,
    "N" => Element::N,
    "O" => Element::O,
    "S" => Element::S,
    "P" => Element::P,
    "F" => Element::F,
    "CL" => Element::Cl,
    "BR" => Element::Br,
    "I" => Element::I,
    "SE" => Element::Se,
    "NA" => Element::Na,
    "K" => Element::K,
    "MG" => Element::Mg,
    "CA" => Element::Ca,
    "MN" => Element::Mn,
    "FE" => Element::Fe,
    "CO" => Element::Co,
    "NI" => Element::Ni,
    "CU" => Element::Cu,
    "ZN" => Element::Zn,
};

impl Element {
    /// The canonical symbol, e.g. `"Cl"`. `Unknown` renders as `"X"`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::S => "S",
            Element::P => "P",
            Element::F => "F",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
            Element::Se => "Se",
            Element::Na => "Na",
            Element::K => "K",
            Element::Mg => "Mg",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Unknown => "X",
        }
    }

    /// Parses a symbol, mapping anything unrecognized to `Unknown`.
    ///
    /// This is the lenient entry point used by the file readers: an exotic
    /// element in a structure is not an error, it just never gets a channel.
    pub fn from_symbol_lossy(symbol: &str) -> Self {
        symbol.parse().unwrap_or(Element::Unknown)
    }

    /// Fixed display colour (RGB) used when exporting occupied voxels.
    ///
    /// Carbon is grey, nitrogen blue, oxygen red, and sulfur orange; the rest
    /// follow the usual CPK/Jmol conventions.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Element::H => [255, 255, 255],
            Element::C => [144, 144, 144],
            Element::N => [48, 80, 248],
            Element::O => [255, 13, 13],
            Element::S => [255, 165, 0],
            Element::P => [255, 128, 0],
            Element::F => [144, 224, 80],
            Element::Cl => [31, 240, 31],
            Element::Br => [166, 41, 41],
            Element::I => [148, 0, 148],
            Element::Se => [255, 161, 0],
            Element::Na => [171, 92, 242],
            Element::K => [143, 64, 212],
            Element::Mg => [138, 255, 0],
            Element::Ca => [61, 255, 0],
            Element::Mn => [156, 122, 199],
            Element::Fe => [224, 102, 51],
            Element::Co => [240, 144, 160],
            Element::Ni => [80, 208, 80],
            Element::Cu => [200, 128, 51],
            Element::Zn => [125, 128, 176],
            Element::Unknown => [255, 20, 147],
        }
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses an element symbol, case-insensitively and ignoring surrounding
    /// whitespace. `"X"` and empty strings are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        ELEMENT_SYMBOLS
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ParseElementError(s.trim().to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_common_symbols() {
        assert_eq!(Element::from_str("C"), Ok(Element::C));
        assert_eq!(Element::from_str("N"), Ok(Element::N));
        assert_eq!(Element::from_str("O"), Ok(Element::O));
        assert_eq!(Element::from_str("S"), Ok(Element::S));
        assert_eq!(Element::from_str("Zn"), Ok(Element::Zn));
    }

    #[test]
    fn from_str_is_case_insensitive_and_trims() {
        assert_eq!(Element::from_str(" cl "), Ok(Element::Cl));
        assert_eq!(Element::from_str("FE"), Ok(Element::Fe));
        assert_eq!(Element::from_str("sE"), Ok(Element::Se));
    }

    #[test]
    fn deuterium_is_treated_as_hydrogen() {
        assert_eq!(Element::from_str("D"), Ok(Element::H));
    }

    #[test]
    fn from_str_rejects_unknown_symbols() {
        assert_eq!(
            Element::from_str("Xe"),
            Err(ParseElementError("Xe".to_string()))
        );
        assert!(Element::from_str("").is_err());
        assert!(Element::from_str("X").is_err());
    }

    #[test]
    fn lossy_parse_falls_back_to_unknown() {
        assert_eq!(Element::from_symbol_lossy("Uuo"), Element::Unknown);
        assert_eq!(Element::from_symbol_lossy("c"), Element::C);
    }

    #[test]
    fn symbol_round_trips_through_display() {
        assert_eq!(Element::Cl.to_string(), "Cl");
        assert_eq!(Element::Unknown.to_string(), "X");
        assert_eq!(Element::from_str(&Element::Br.to_string()), Ok(Element::Br));
    }

    #[test]
    fn core_elements_have_distinct_colors() {
        let colors = [
            Element::C.color(),
            Element::N.color(),
            Element::O.color(),
            Element::S.color(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

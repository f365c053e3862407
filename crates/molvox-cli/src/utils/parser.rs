use molvox::core::models::element::Element;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unrecognized element symbol '{0}'. Expected a symbol such as C, N, O, S, Zn.")]
    InvalidElement(String),

    #[error("The element list is empty. Give at least one symbol (e.g., 'C,N,O,S').")]
    EmptyElementList,

    #[error("Invalid boolean '{0}'. Expected 'true' or 'false'.")]
    InvalidBool(String),
}

/// Parses element symbols in order, skipping blank entries left by stray commas.
pub fn parse_element_list<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<Element>, ParseError> {
    let elements = symbols
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| ParseError::InvalidElement(s.to_string())))
        .collect::<Result<Vec<Element>, _>>()?;

    if elements.is_empty() {
        return Err(ParseError::EmptyElementList);
    }
    Ok(elements)
}

/// Splits a comma-separated list such as `"C, N,O"`.
pub fn parse_element_csv(value: &str) -> Result<Vec<Element>, ParseError> {
    let parts: Vec<&str> = value.split(',').collect();
    parse_element_list(&parts)
}

pub fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ParseError::InvalidBool(value.to_string())),
    }
}

use crate::symbolic::parse_expr::ParseError;
use thiserror::Error;

/// Error types for building and using functions.
///
/// All of them are deterministic results of the construction or call arguments; a failed call
/// leaves the function untouched and may be retried with corrected arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    #[error("cannot parse output formula #{index} '{formula}': {source}")]
    Parse {
        index: usize,
        formula: String,
        source: ParseError,
    },
    #[error("arity error: {0}")]
    Arity(String),
    #[error("dimension mismatch: expected a point of dimension {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("marginal index {index} is out of range for output dimension {dimension}")]
    Index { index: usize, dimension: usize },
    #[error("invalid description: {0}")]
    Description(String),
}

/// Checks that every index selects an existing output.
pub fn check_marginal_indices(indices: &[usize], dimension: usize) -> Result<(), FunctionError> {
    if indices.is_empty() {
        return Err(FunctionError::Arity(
            "a marginal needs at least one output index".to_string(),
        ));
    }
    match indices.iter().find(|&&i| i >= dimension) {
        Some(&index) => Err(FunctionError::Index { index, dimension }),
        None => Ok(()),
    }
}

pub fn check_point_dimension(point: &[f64], expected: usize) -> Result<(), FunctionError> {
    if point.len() != expected {
        return Err(FunctionError::DimensionMismatch {
            expected,
            got: point.len(),
        });
    }
    Ok(())
}

/// Names must be identifiers (`[A-Za-z_][A-Za-z0-9_]*`) and pairwise distinct.
pub fn check_description(names: &[String], what: &str) -> Result<(), FunctionError> {
    for (i, name) in names.iter().enumerate() {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(FunctionError::Description(format!(
                "{} name '{}' is not a valid identifier",
                what, name
            )));
        }
        if names[..i].contains(name) {
            return Err(FunctionError::Description(format!(
                "{} name '{}' is used more than once",
                what, name
            )));
        }
    }
    Ok(())
}

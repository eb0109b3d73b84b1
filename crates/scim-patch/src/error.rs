use scim_path::ParseError;
use thiserror::Error;

/// Structural problems with a PATCH request, found before anything is applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid parameter: schemas must be exactly [{expected}], got {found:?}")]
    UnsupportedSchemas { expected: &'static str, found: Vec<String> },
    #[error("Invalid parameter: no operations")]
    NoOperations,
    #[error("Invalid parameter: operation {index} has no value")]
    MissingValue { index: usize },
    #[error("Invalid parameter: operation {index} has no path")]
    MissingPath { index: usize },
    #[error("Invalid parameter: operation {index} adds without a path but its value is not an object")]
    ImplicitAddNotMapping { index: usize },
    #[error("Invalid operation {op:?} at {index}: must be one of [add|remove|replace]")]
    InvalidOperation { index: usize, op: String },
}

/// Failure applying a single PATCH operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No attribute found for path: {0}")]
    NoAttribute(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("{0} requires a path")]
    MissingPath(&'static str),
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("Add without a path requires an object value")]
    ImplicitAddNotMapping,
    #[error("Invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },
    #[error("Base evaluated to neither an object nor an array: {0}")]
    InvalidBase(String),
    #[error("Array base contains a non-object element: {0}")]
    NonMappingElement(String),
}

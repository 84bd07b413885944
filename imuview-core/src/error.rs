//! Error types for protocol parsing

use thiserror::Error;

/// Errors that can occur when parsing a line from the sensor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Line did not split into the expected number of comma separated fields
    #[error("Expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// A `name:value` field had no `:` separator
    #[error("Field '{0}' has no ':' separator")]
    MissingSeparator(String),

    /// The value part of a field is not a number
    #[error("Invalid number '{value}' in field {field}")]
    InvalidNumber { field: char, value: String },
}

//! Error types for the digit pipeline.

use thiserror::Error;

/// Errors the digit actors emit on their exception lane.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DigitError {
    /// A chunk contained something other than an ASCII digit.
    #[error("Non-digit character {character} in {chunk}")]
    NonDigit { character: char, chunk: String },

    /// A stage received a payload of a type it cannot handle.
    #[error("{stage} cannot handle a payload of type {type_name}")]
    UnexpectedPayload {
        stage: &'static str,
        type_name: &'static str,
    },
}

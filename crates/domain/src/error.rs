//! Unified error types for the domain layer
//!
//! Every fallible rule operation returns [`DomainError`]. Dice grammar and
//! argument failures originate as [`DiceError`] and convert losslessly.

use thiserror::Error;

use crate::value_objects::DiceError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A dice notation string does not match the grammar
    #[error("Malformed dice notation: {0}")]
    MalformedNotation(String),

    /// An argument outside its allowed domain (die sides, bucket count, unset value)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value falls outside every row of a rule table
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Validation failed (e.g., invalid identity field values)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an out of range error for rule-table gaps.
    ///
    /// # Example
    /// ```ignore
    /// if total >= 205 {
    ///     return Err(DomainError::out_of_range(format!("STR + SIZ ({total}) > 204")));
    /// }
    /// ```
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<DiceError> for DomainError {
    fn from(err: DiceError) -> Self {
        match err {
            DiceError::MalformedNotation { .. } => Self::MalformedNotation(err.to_string()),
            DiceError::InvalidSides(_)
            | DiceError::InvalidRepeatCount(_)
            | DiceError::InvalidBucketCount(_) => Self::InvalidArgument(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_grammar_errors_become_malformed_notation() {
        let err: DomainError = DiceError::MalformedNotation {
            notation: "3X6".to_string(),
            reason: "unexpected term '3X6'".to_string(),
        }
        .into();
        assert!(matches!(err, DomainError::MalformedNotation(_)));
        assert!(err.to_string().contains("3X6"));
    }

    #[test]
    fn dice_argument_errors_become_invalid_argument() {
        let err: DomainError = DiceError::InvalidSides(0).into();
        assert!(matches!(err, DomainError::InvalidArgument(_)));

        let err: DomainError = DiceError::InvalidBucketCount(0).into();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }
}

// crates/hieracheck-core/src/error.rs
// ============================================================================
// Module: Validator Errors
// Description: Argument, state, and validation failure kinds.
// Purpose: Keep validation failures distinguishable from malformed calls.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every failing `validate` call surfaces exactly one [`ValidatorError`].
//! Malformed calls are [`ArgumentError`]s, a missing store is
//! [`ValidatorError::NoData`], and everything discovered while checking data
//! (load errors, missing keys, predicate failures) is a single aggregated
//! [`ValidationError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Argument Errors
// ============================================================================

/// Malformed `validate` arguments, raised before any data access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The search key is not a string, symbol, or pattern.
    #[error("Search key must be a String, Symbol or a Regexp")]
    InvalidKey,
    /// The required files argument is neither absent nor a sequence.
    #[error("required files should be an Array")]
    InvalidRequiredFiles,
    /// A required files entry is not an identifier.
    #[error("required file identifiers must be Strings or Symbols")]
    InvalidRequiredFile,
    /// A pattern key failed to compile.
    #[error("Search pattern is invalid: {0}")]
    InvalidPattern(String),
}

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Aggregated validation failure carrying one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Aggregated failure message.
    message: String,
}

impl ValidationError {
    /// Creates a validation error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the aggregated message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// SECTION: Validator Errors
// ============================================================================

/// Failure of a `validate` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    /// Malformed call arguments.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// No data set has been loaded.
    #[error("No data available, load data before validating")]
    NoData,
    /// Load errors, missing matches, or predicate failures.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ValidatorError {
    /// Returns true for aggregated validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true for malformed call arguments.
    #[must_use]
    pub const fn is_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Returns the validation failure, if this is one.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}

/// Result alias for validator operations.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

// ============================================================================
// SECTION: Predicate Failures
// ============================================================================

/// Failure signalled by a caller-supplied predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateFailure {
    /// Predicate-provided detail appended to the failure entry.
    detail: String,
}

impl PredicateFailure {
    /// Creates a predicate failure with detail text.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// Returns the detail text.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for PredicateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl std::error::Error for PredicateFailure {}

impl From<String> for PredicateFailure {
    fn from(detail: String) -> Self {
        Self::new(detail)
    }
}

impl From<&str> for PredicateFailure {
    fn from(detail: &str) -> Self {
        Self::new(detail)
    }
}

/// Result returned by validation predicates.
pub type PredicateResult = Result<(), PredicateFailure>;

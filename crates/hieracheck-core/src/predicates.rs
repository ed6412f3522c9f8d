// crates/hieracheck-core/src/predicates.rs
// ============================================================================
// Module: Common Predicates
// Description: Reusable value checks for JSON-valued data sets.
// Purpose: Cover the shape assertions most layer tests need.
// Dependencies: regex, serde_json
// ============================================================================

//! ## Overview
//! Ready-made predicates for [`Validator`](crate::Validator) calls over
//! `serde_json::Value` data. Plain checks are functions; parameterized checks
//! return closures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde_json::Value;

use crate::error::ArgumentError;
use crate::error::PredicateFailure;
use crate::error::PredicateResult;

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Returns a short label for the JSON type of `value`.
#[must_use]
pub const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Builds the failure for a type mismatch.
fn expected(label: &str, value: &Value) -> PredicateFailure {
    PredicateFailure::new(format!("expected {label}, got {}", kind(value)))
}

/// Requires a string value.
///
/// # Errors
///
/// Returns [`PredicateFailure`] for any other type.
pub fn is_string(value: &Value) -> PredicateResult {
    if value.is_string() { Ok(()) } else { Err(expected("string", value)) }
}

/// Requires a boolean value.
///
/// # Errors
///
/// Returns [`PredicateFailure`] for any other type.
pub fn is_bool(value: &Value) -> PredicateResult {
    if value.is_boolean() { Ok(()) } else { Err(expected("boolean", value)) }
}

/// Requires an integer value.
///
/// # Errors
///
/// Returns [`PredicateFailure`] for any other type, including floats.
pub fn is_integer(value: &Value) -> PredicateResult {
    if value.is_i64() || value.is_u64() { Ok(()) } else { Err(expected("integer", value)) }
}

/// Requires a sequence value.
///
/// # Errors
///
/// Returns [`PredicateFailure`] for any other type.
pub fn is_sequence(value: &Value) -> PredicateResult {
    if value.is_array() { Ok(()) } else { Err(expected("sequence", value)) }
}

/// Requires a mapping value.
///
/// # Errors
///
/// Returns [`PredicateFailure`] for any other type.
pub fn is_mapping(value: &Value) -> PredicateResult {
    if value.is_object() { Ok(()) } else { Err(expected("mapping", value)) }
}

/// Requires a value equal to `wanted`.
pub fn equals(wanted: Value) -> impl Fn(&Value) -> PredicateResult {
    move |value| {
        if *value == wanted {
            Ok(())
        } else {
            Err(PredicateFailure::new(format!("expected {wanted}, got {value}")))
        }
    }
}

/// Requires a value equal to one of `allowed`.
pub fn one_of(allowed: Vec<Value>) -> impl Fn(&Value) -> PredicateResult {
    move |value| {
        if allowed.contains(value) {
            return Ok(());
        }
        let choices: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        Err(PredicateFailure::new(format!("{value} is not one of {}", choices.join(", "))))
    }
}

/// Requires a string value matching `pattern`.
///
/// # Errors
///
/// Returns [`ArgumentError::InvalidPattern`] when the pattern does not
/// compile.
pub fn matches_pattern(
    pattern: &str,
) -> Result<impl Fn(&Value) -> PredicateResult, ArgumentError> {
    let regex =
        Regex::new(pattern).map_err(|err| ArgumentError::InvalidPattern(err.to_string()))?;
    Ok(move |value: &Value| match value {
        Value::String(text) if regex.is_match(text) => Ok(()),
        Value::String(text) => Err(PredicateFailure::new(format!(
            "\"{}\" does not match /{}/",
            text.escape_debug(),
            regex.as_str()
        ))),
        other => Err(expected("string", other)),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

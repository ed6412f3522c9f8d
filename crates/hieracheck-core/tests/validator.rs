// crates/hieracheck-core/tests/validator.rs
// ============================================================================
// Module: Validator Tests
// Description: End-to-end behavior of validate calls over the fixture store.
// Purpose: Pin key equivalence, aggregation, and exact failure messages.
// Dependencies: hieracheck-core, serde_json
// ============================================================================

//! ## Overview
//! Covers exact and pattern matching, required-file semantics, argument
//! checks, and the precedence of load errors and missing data.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use hieracheck_core::ArgumentError;
use hieracheck_core::DataKey;
use hieracheck_core::DataSet;
use hieracheck_core::DataStore;
use hieracheck_core::LoadOutcome;
use hieracheck_core::PredicateFailure;
use hieracheck_core::SearchKey;
use hieracheck_core::Validator;
use hieracheck_core::ValidatorError;
use hieracheck_core::predicates;
use serde_json::Value;
use serde_json::json;

use crate::common::loaded_validator;
use crate::common::validator_with_load_errors;

/// Returns the failure message of a validate result.
fn failure_message(result: Result<&Validator, ValidatorError>) -> String {
    match result {
        Ok(_) => panic!("expected validate to fail"),
        Err(err) => err.to_string(),
    }
}

// ============================================================================
// SECTION: Exact Keys
// ============================================================================

#[test]
fn loaded_data_is_exposed() {
    let validator = loaded_validator();
    let data = validator.data().unwrap();
    assert!(data.contains("file1"));
    assert_eq!(data.len(), 3);
    assert!(validator.load_errors().is_empty());
}

#[test]
fn block_is_used_to_validate_key() {
    let validator = loaded_validator();
    assert!(validator.validate("key", predicates::equals(json!("value"))).is_ok());
    let err = validator.validate("key", predicates::equals(json!("oooops"))).err().unwrap();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "key is invalid in file1: expected \"oooops\", got \"value\"");
}

#[test]
fn string_and_symbol_keys_are_interchangeable() {
    let validator = loaded_validator();
    let mut seen = Vec::new();
    validator
        .validate("other", |value| {
            seen.push(value.clone());
            Ok(())
        })
        .unwrap();
    validator
        .validate(SearchKey::symbol("other"), |value| {
            seen.push(value.clone());
            Ok(())
        })
        .unwrap();
    assert_eq!(seen, vec![json!("other value"), json!("other value")]);
    assert!(validator.validate(SearchKey::symbol("key"), predicates::is_string).is_ok());
}

#[test]
fn key_is_validated_in_all_files() {
    let validator = loaded_validator();
    let err = validator.validate("missmatch", predicates::is_string).err().unwrap();
    assert!(err.is_validation());
    let message = err.to_string();
    assert!(message.contains("missmatch is invalid in file2"), "{message}");
    assert!(!message.contains("file1"), "{message}");
}

#[test]
fn every_failing_data_set_is_reported() {
    let validator = loaded_validator();
    let message = failure_message(validator.validate("missmatch", |_| {
        Err(PredicateFailure::new("rejected"))
    }));
    assert_eq!(
        message,
        "missmatch is invalid in file1: rejected\nmissmatch is invalid in file2: rejected"
    );
}

#[test]
fn key_stored_in_both_forms_is_checked_per_entry() {
    let both: DataSet = [
        (DataKey::string("cat"), json!("black")),
        (DataKey::symbol("cat"), json!(["tabby"])),
    ]
    .into_iter()
    .collect();
    let store: DataStore = [("pets", both)].into_iter().collect();
    let validator = Validator::from_outcome(LoadOutcome::clean(store));
    let mut calls = 0;
    let err = validator
        .validate(SearchKey::symbol("cat"), |_| {
            calls += 1;
            Err(PredicateFailure::new("nope"))
        })
        .err()
        .unwrap();
    assert_eq!(calls, 2);
    let failure = err.as_validation().unwrap();
    assert_eq!(failure.message(), "cat is invalid in pets: nope\ncat is invalid in pets: nope");
    let message = failure_message(validator.validate("cat", predicates::is_string));
    assert_eq!(message, "cat is invalid in pets: expected string, got sequence");
}

#[test]
fn missing_exact_key_is_reported() {
    let validator = loaded_validator();
    let message = failure_message(validator.validate("dog", |_| Ok(())));
    assert_eq!(message, "No match for \"dog\" was not found");
    let message = failure_message(validator.validate(SearchKey::symbol("dog"), |_| Ok(())));
    assert_eq!(message, "No match for :dog was not found");
}

// ============================================================================
// SECTION: Pattern Keys
// ============================================================================

#[test]
fn pattern_without_match_fails() {
    let validator = loaded_validator();
    let key = SearchKey::pattern("nonex").unwrap();
    let message = failure_message(validator.validate(key, |_| Ok(())));
    assert_eq!(message, "No match for /nonex/ was not found");
}

#[test]
fn pattern_with_match_passes() {
    let validator = loaded_validator();
    assert!(validator.validate(SearchKey::pattern("at$").unwrap(), |_| Ok(())).is_ok());
}

#[test]
fn pattern_checks_every_match_once() {
    let validator = loaded_validator();
    let mut seen = Vec::new();
    validator
        .validate(SearchKey::pattern("at$").unwrap(), |value| {
            seen.push(value.clone());
            Ok(())
        })
        .unwrap();
    seen.sort_by_key(ToString::to_string);
    assert_eq!(seen, vec![json!("black"), json!("fedora")]);
}

#[test]
fn pattern_matches_symbol_keys() {
    let validator = loaded_validator();
    let key = SearchKey::pattern("other").unwrap();
    assert!(validator.validate(key, predicates::equals(json!("other value"))).is_ok());
}

#[test]
fn pattern_failure_names_pattern_and_file() {
    let validator = loaded_validator();
    let key = SearchKey::pattern("^miss").unwrap();
    let message = failure_message(validator.validate(key, predicates::is_string));
    assert_eq!(message, "/^miss/ is invalid in file2: expected string, got sequence");
}

// ============================================================================
// SECTION: Required Files
// ============================================================================

#[test]
fn key_missing_from_required_file_fails() {
    let validator = loaded_validator();
    let err = validator.validate_in("cat", &["file2"], |_| Ok(())).err().unwrap();
    assert!(err.is_validation());
}

#[test]
fn missing_required_files_are_listed() {
    let validator = loaded_validator();
    let message = failure_message(validator.validate_in("cat", &["file2", "file3"], |_| Ok(())));
    assert_eq!(message, "No match for \"cat\" was not found in: file2, file3");
}

#[test]
fn key_absent_everywhere_reports_any_files() {
    let validator = loaded_validator();
    let message = failure_message(validator.validate_in("dog", &["file1"], |_| Ok(())));
    assert_eq!(message, "No match for \"dog\" was not found in any files");
}

#[test]
fn required_files_satisfied_passes() {
    let validator = loaded_validator();
    assert!(validator.validate_in("missmatch", &["file1", "file2"], |_| Ok(())).is_ok());
    let key = SearchKey::pattern("at$").unwrap();
    assert!(validator.validate_in(key, &["file1", "file2"], predicates::is_string).is_ok());
}

#[test]
fn unknown_required_file_is_reported_missing() {
    let validator = loaded_validator();
    let message = failure_message(validator.validate_in("cat", &["file1", "ghost"], |_| Ok(())));
    assert_eq!(message, "No match for \"cat\" was not found in: ghost");
}

#[test]
fn empty_required_files_mean_no_constraint() {
    let validator = loaded_validator();
    let none: [&str; 0] = [];
    assert!(validator.validate_in("cat", &none, |_| Ok(())).is_ok());
    let message = failure_message(validator.validate_in("dog", &none, |_| Ok(())));
    assert_eq!(message, "No match for \"dog\" was not found");
}

// ============================================================================
// SECTION: Argument Checks
// ============================================================================

#[test]
fn invalid_key_type_is_argument_error() {
    let validator = loaded_validator();
    let err = validator.validate_value(&json!(["key"]), &Value::Null, |_| Ok(())).err().unwrap();
    assert_eq!(err, ValidatorError::Argument(ArgumentError::InvalidKey));
    assert_eq!(err.to_string(), "Search key must be a String, Symbol or a Regexp");
}

#[test]
fn invalid_required_files_type_is_argument_error() {
    let validator = loaded_validator();
    let err =
        validator.validate_value(&json!("cat"), &json!("not-an-array"), |_| Ok(())).err().unwrap();
    assert!(err.is_argument());
    assert_eq!(err.to_string(), "required files should be an Array");
}

#[test]
fn arguments_are_checked_before_data() {
    let validator: Validator = Validator::new();
    let err = validator.validate_value(&json!(42), &Value::Null, |_| Ok(())).err().unwrap();
    assert!(err.is_argument());
    let validator = validator_with_load_errors(&["file1 is empty"]);
    let err = validator.validate_value(&json!("cat"), &json!({}), |_| Ok(())).err().unwrap();
    assert!(err.is_argument());
}

#[test]
fn dynamic_arguments_reach_the_engine() {
    let validator = loaded_validator();
    let message = failure_message(validator.validate_value(
        &json!("cat"),
        &json!(["file2", {"symbol": "file3"}]),
        |_| Ok(()),
    ));
    assert_eq!(message, "No match for \"cat\" was not found in: file2, file3");
    assert!(validator.validate_value(&json!({"pattern": "at$"}), &Value::Null, |_| Ok(())).is_ok());
    assert!(validator.validate_value(&json!({"symbol": "other"}), &json!(null), |_| Ok(())).is_ok());
}

// ============================================================================
// SECTION: Load State
// ============================================================================

#[test]
fn load_errors_fail_every_call() {
    let validator = validator_with_load_errors(&["file1 is empty", "file2 has syntax errors"]);
    let err = validator.validate("", |_| Ok(())).err().unwrap();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "file1 is empty\nfile2 has syntax errors");
    let message = failure_message(validator.validate("cat", |_| Ok(())));
    assert_eq!(message, "file1 is empty\nfile2 has syntax errors");
    assert_eq!(err.as_validation().map(|failure| failure.message()), Some(message.as_str()));
}

#[test]
fn load_errors_take_priority_over_loaded_data() {
    let validator = Validator::from_outcome(LoadOutcome {
        store: common::fixture_store(),
        errors: vec!["file4 is empty".to_string()],
    });
    let message = failure_message(validator.validate("cat", |_| Ok(())));
    assert_eq!(message, "file4 is empty");
}

#[test]
fn load_outcome_reports_cleanliness() {
    assert!(LoadOutcome::clean(common::fixture_store()).is_clean());
    let dirty = LoadOutcome {
        store: common::fixture_store(),
        errors: vec!["file4 is empty".to_string()],
    };
    assert!(!dirty.is_clean());
}

#[test]
fn absent_data_fails_with_no_data() {
    let validator: Validator = Validator::new();
    let err = validator.validate("meh", |_| Ok(())).err().unwrap();
    assert_eq!(err, ValidatorError::NoData);
    assert!(err.to_string().contains("No data available"));
    assert!(!err.is_validation());
    assert!(err.as_validation().is_none());
}

#[test]
fn empty_data_fails_with_no_data() {
    let validator: Validator = Validator::from_outcome(LoadOutcome::clean(DataStore::new()));
    let err = validator.validate("", |_| Ok(())).err().unwrap();
    assert!(err.to_string().contains("No data available"));
}

#[test]
fn reload_replaces_store_and_errors() {
    let mut validator = validator_with_load_errors(&["file1 is empty"]);
    assert!(validator.validate("cat", |_| Ok(())).is_err());
    validator.install(LoadOutcome::clean(common::fixture_store()));
    assert!(validator.load_errors().is_empty());
    assert!(validator.validate("cat", |_| Ok(())).is_ok());
}

// ============================================================================
// SECTION: Determinism
// ============================================================================

#[test]
fn repeated_calls_produce_identical_outcomes() {
    let validator = loaded_validator();
    let first = validator.validate("missmatch", predicates::is_string).err();
    let second = validator.validate("missmatch", predicates::is_string).err();
    assert_eq!(first, second);
    assert!(validator.validate("cat", |_| Ok(())).is_ok());
    assert!(validator.validate("cat", |_| Ok(())).is_ok());
}

#[test]
fn successful_validate_returns_validator_for_chaining() {
    let validator = loaded_validator();
    let chained = validator
        .validate("cat", predicates::is_string)
        .and_then(|v| v.validate("hat", predicates::is_string))
        .unwrap();
    assert!(std::ptr::eq(chained, &validator));
}

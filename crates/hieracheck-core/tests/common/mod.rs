// crates/hieracheck-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared data sets and loader doubles for validator tests.
// Purpose: Provide one deterministic store for every validator suite.
// Dependencies: hieracheck-core, serde_json
// ============================================================================

//! ## Overview
//! The fixture store holds three data sets (`file1`, `file2`, `file3`) that
//! mix string and symbol keys, a key whose value type differs between sets,
//! and keys that share a suffix for pattern tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use hieracheck_core::DataKey;
use hieracheck_core::DataLoader;
use hieracheck_core::DataSet;
use hieracheck_core::DataStore;
use hieracheck_core::LoadOutcome;
use hieracheck_core::Validator;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Returns the shared fixture store.
#[must_use]
pub fn fixture_store() -> DataStore {
    let file1: DataSet = [
        (DataKey::string("key"), json!("value")),
        (DataKey::symbol("other"), json!("other value")),
        (DataKey::string("missmatch"), json!("string")),
        (DataKey::string("cat"), json!("black")),
    ]
    .into_iter()
    .collect();
    let file2: DataSet = [
        (DataKey::string("hello"), json!("world")),
        (DataKey::string("missmatch"), json!(["array"])),
        (DataKey::string("hat"), json!("fedora")),
    ]
    .into_iter()
    .collect();
    let file3: DataSet = [(DataKey::string("squid"), json!("giant"))].into_iter().collect();
    [("file1", file1), ("file2", file2), ("file3", file3)].into_iter().collect()
}

/// Loader double returning a fixed outcome.
pub struct StaticLoader {
    /// Outcome handed out on every load.
    pub outcome: LoadOutcome,
}

impl DataLoader<Value> for StaticLoader {
    fn load(&self) -> LoadOutcome {
        self.outcome.clone()
    }
}

/// Returns a validator loaded with the fixture store.
#[must_use]
pub fn loaded_validator() -> Validator {
    let mut validator = Validator::new();
    validator.load(&StaticLoader {
        outcome: LoadOutcome::clean(fixture_store()),
    });
    validator
}

/// Returns a validator whose load produced the given errors and no data.
#[must_use]
pub fn validator_with_load_errors(errors: &[&str]) -> Validator {
    Validator::from_outcome(LoadOutcome {
        store: DataStore::new(),
        errors: errors.iter().map(ToString::to_string).collect(),
    })
}

// crates/hieracheck-core/src/validator.rs
// ============================================================================
// Module: Validator
// Description: Search-and-validate engine over a loaded data store.
// Purpose: Locate matching entries, run predicates, aggregate failures.
// Dependencies: crate::{audit, data, error, key}, serde_json
// ============================================================================

//! ## Overview
//! A [`Validator`] owns one load cycle (store plus load-error log) and
//! answers repeated `validate` calls against it. Each call resolves its key
//! once, scans every data set's top-level keys, invokes the predicate per
//! match, and folds every problem it finds into one [`ValidationError`].
//!
//! Check order per call: arguments, load errors, presence of data, then the
//! scan. Predicate failures never stop the scan; all of them are reported
//! together.
//!
//! ```
//! use hieracheck_core::DataSet;
//! use hieracheck_core::DataStore;
//! use hieracheck_core::LoadOutcome;
//! use hieracheck_core::Validator;
//! use hieracheck_core::predicates;
//! use serde_json::json;
//!
//! let common: DataSet = [("ntp::servers", json!(["pool.ntp.org"]))].into_iter().collect();
//! let store: DataStore = [("common", common)].into_iter().collect();
//! let validator = Validator::from_outcome(LoadOutcome::clean(store));
//!
//! assert!(validator.validate("ntp::servers", predicates::is_sequence).is_ok());
//! assert!(validator.validate_in("ntp::servers", &["common", "node"], |_| Ok(())).is_err());
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;

use crate::audit::LoadAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::ValidateAuditEvent;
use crate::audit::ValidateAuditEventParams;
use crate::audit::ValidateOutcome;
use crate::audit::ValidationAuditSink;
use crate::data::DataLoader;
use crate::data::DataSetId;
use crate::data::DataStore;
use crate::data::LoadErrorLog;
use crate::data::LoadOutcome;
use crate::error::PredicateFailure;
use crate::error::PredicateResult;
use crate::error::ValidationError;
use crate::error::ValidatorError;
use crate::error::ValidatorResult;
use crate::key::RequiredFiles;
use crate::key::SearchKey;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Search-and-validate engine over one immutable load cycle.
///
/// # Invariants
/// - The store and load-error log are replaced together, never mutated.
/// - `validate*` calls take `&self` and are side-effect free apart from
///   audit events.
pub struct Validator<V = Value> {
    /// Loaded store; `None` until a load cycle is installed.
    data: Option<DataStore<V>>,
    /// Problems recorded while producing `data`.
    load_errors: LoadErrorLog,
    /// Destination for audit events.
    audit: Arc<dyn ValidationAuditSink>,
}

impl<V> Default for Validator<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Validator<V> {
    /// Creates a validator with no data loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: None,
            load_errors: Vec::new(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Creates a validator from a completed load cycle.
    #[must_use]
    pub fn from_outcome(outcome: LoadOutcome<V>) -> Self {
        let mut validator = Self::new();
        validator.install(outcome);
        validator
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Runs `loader` and installs its outcome, replacing any previous one.
    pub fn load<L>(&mut self, loader: &L) -> &mut Self
    where
        L: DataLoader<V> + ?Sized,
    {
        self.install(loader.load());
        self
    }

    /// Installs a load outcome, replacing the store and error log together.
    pub fn install(&mut self, outcome: LoadOutcome<V>) {
        self.audit.record_load(&LoadAuditEvent::new(outcome.store.len(), outcome.errors.clone()));
        self.data = Some(outcome.store);
        self.load_errors = outcome.errors;
    }

    /// Returns the loaded store, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&DataStore<V>> {
        self.data.as_ref()
    }

    /// Returns the load-error log of the installed cycle.
    #[must_use]
    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    /// Validates every entry matching `key` across all data sets.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Validation`] on load errors, when nothing
    /// matches, or when any predicate fails; [`ValidatorError::NoData`] when
    /// no data set is loaded.
    pub fn validate<K, F>(&self, key: K, predicate: F) -> ValidatorResult<&Self>
    where
        K: Into<SearchKey>,
        F: FnMut(&V) -> PredicateResult,
    {
        self.validate_with(&key.into(), None, predicate)
    }

    /// Validates `key` and requires a match in each listed data set.
    ///
    /// # Errors
    ///
    /// As [`Validator::validate`], plus a [`ValidatorError::Validation`]
    /// naming every required data set without a match.
    pub fn validate_in<K, S, F>(
        &self,
        key: K,
        required_files: &[S],
        predicate: F,
    ) -> ValidatorResult<&Self>
    where
        K: Into<SearchKey>,
        S: AsRef<str>,
        F: FnMut(&V) -> PredicateResult,
    {
        let required =
            RequiredFiles::new(required_files.iter().map(|id| DataSetId::new(id.as_ref())));
        self.validate_with(&key.into(), Some(&required), predicate)
    }

    /// Validates using loosely typed arguments.
    ///
    /// `key` and `required_files` are checked before any data access; see
    /// [`SearchKey::from_value`] and [`RequiredFiles::from_value`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Argument`] for malformed arguments, then
    /// behaves as [`Validator::validate_with`].
    pub fn validate_value<F>(
        &self,
        key: &Value,
        required_files: &Value,
        predicate: F,
    ) -> ValidatorResult<&Self>
    where
        F: FnMut(&V) -> PredicateResult,
    {
        let parsed = SearchKey::from_value(key).and_then(|key| {
            RequiredFiles::from_value(required_files).map(|required| (key, required))
        });
        match parsed {
            Ok((key, required)) => self.validate_with(&key, required.as_ref(), predicate),
            Err(err) => {
                let err = ValidatorError::from(err);
                self.record_validate(None, ScanCounts::default(), &Err(err.clone()));
                Err(err)
            }
        }
    }

    /// Validates a resolved key with an optional required-file constraint.
    ///
    /// An empty required-file list is treated as no constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Validation`] carrying the load-error log when
    /// it is non-empty, [`ValidatorError::NoData`] when the store is absent or
    /// empty, and otherwise a [`ValidatorError::Validation`] aggregating
    /// predicate failures and missing matches.
    pub fn validate_with<F>(
        &self,
        key: &SearchKey,
        required_files: Option<&RequiredFiles>,
        mut predicate: F,
    ) -> ValidatorResult<&Self>
    where
        F: FnMut(&V) -> PredicateResult,
    {
        let store = match self.ready() {
            Ok(store) => store,
            Err(err) => {
                self.record_validate(Some(key), ScanCounts::default(), &Err(err.clone()));
                return Err(err);
            }
        };
        let report = scan(store, key, &mut predicate);
        let result = report.conclude(key, required_files).map_err(ValidatorError::from);
        self.record_validate(Some(key), report.counts(), &result);
        result.map(|()| self)
    }

    /// Returns the store when it may be searched.
    fn ready(&self) -> ValidatorResult<&DataStore<V>> {
        if !self.load_errors.is_empty() {
            return Err(ValidationError::new(self.load_errors.join("\n")).into());
        }
        match &self.data {
            Some(store) if !store.is_empty() => Ok(store),
            _ => Err(ValidatorError::NoData),
        }
    }

    /// Emits the audit event for one validate call.
    fn record_validate(
        &self,
        key: Option<&SearchKey>,
        counts: ScanCounts,
        result: &ValidatorResult<()>,
    ) {
        let (outcome, message) = match result {
            Ok(()) => (ValidateOutcome::Passed, None),
            Err(err @ ValidatorError::Validation(_)) => {
                (ValidateOutcome::Failed, Some(err.to_string()))
            }
            Err(err) => (ValidateOutcome::Rejected, Some(err.to_string())),
        };
        self.audit.record_validate(&ValidateAuditEvent::new(ValidateAuditEventParams {
            key: key.map(SearchKey::inspect),
            outcome,
            matches: counts.matches,
            failures: counts.failures,
            message,
        }));
    }
}

// ============================================================================
// SECTION: Scan
// ============================================================================

/// Match and failure totals for audit events.
#[derive(Debug, Clone, Copy, Default)]
struct ScanCounts {
    /// Entries handed to the predicate.
    matches: usize,
    /// Predicate failures.
    failures: usize,
}

/// Findings of one pass over the store.
#[derive(Default)]
struct ScanReport<'a> {
    /// Entries handed to the predicate.
    matches: usize,
    /// Rendered predicate failure entries, in scan order.
    failures: Vec<String>,
    /// Data sets that contributed at least one match.
    matched: BTreeSet<&'a str>,
}

/// Checks every entry matching `key` in every data set.
fn scan<'a, V, F>(store: &'a DataStore<V>, key: &SearchKey, predicate: &mut F) -> ScanReport<'a>
where
    F: FnMut(&V) -> PredicateResult,
{
    let mut report = ScanReport::default();
    for (id, set) in store {
        let found = key.find_in(set);
        if found.is_empty() {
            continue;
        }
        report.matched.insert(id.as_str());
        for (_, value) in found {
            report.matches += 1;
            if let Err(failure) = predicate(value) {
                report.failures.push(failure_entry(key, id, &failure));
            }
        }
    }
    report
}

/// Renders one predicate failure entry.
fn failure_entry(key: &SearchKey, id: &DataSetId, failure: &PredicateFailure) -> String {
    if failure.detail().is_empty() {
        format!("{key} is invalid in {id}")
    } else {
        format!("{key} is invalid in {id}: {failure}")
    }
}

impl ScanReport<'_> {
    /// Returns totals for audit events.
    fn counts(&self) -> ScanCounts {
        ScanCounts {
            matches: self.matches,
            failures: self.failures.len(),
        }
    }

    /// Applies the no-match and required-file policy to the findings.
    fn conclude(
        &self,
        key: &SearchKey,
        required_files: Option<&RequiredFiles>,
    ) -> Result<(), ValidationError> {
        let required = required_files.filter(|files| !files.is_empty());
        let mut lines = self.failures.clone();
        if self.matched.is_empty() {
            lines.push(match required {
                Some(_) => format!("No match for {} was not found in any files", key.inspect()),
                None => format!("No match for {} was not found", key.inspect()),
            });
        } else if let Some(required) = required {
            let missing: Vec<&str> = required
                .ids()
                .iter()
                .map(DataSetId::as_str)
                .filter(|id| !self.matched.contains(id))
                .collect();
            if !missing.is_empty() {
                lines.push(format!(
                    "No match for {} was not found in: {}",
                    key.inspect(),
                    missing.join(", ")
                ));
            }
        }
        if lines.is_empty() { Ok(()) } else { Err(ValidationError::new(lines.join("\n"))) }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

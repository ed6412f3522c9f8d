// crates/hieracheck-core/src/lib.rs
// ============================================================================
// Module: Hieracheck Core Library
// Description: Search-and-validate engine for flat key/value data sets.
// Purpose: Let test suites assert properties of externally authored layers.
// Dependencies: regex, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `hieracheck-core` validates a collection of independently loaded data sets
//! (one per logical file) against caller-supplied predicates. A loader fills a
//! [`Validator`] once; tests then query it with exact or pattern keys and an
//! optional list of data sets that must each contain a match. All problems
//! found by one call are reported as a single [`ValidationError`].
//!
//! The engine never parses files and never looks below a data set's top-level
//! keys; loaders implement [`DataLoader`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod data;
pub mod error;
pub mod key;
pub mod predicates;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::LoadAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidateAuditEvent;
pub use audit::ValidateOutcome;
pub use audit::ValidationAuditSink;
pub use data::DataKey;
pub use data::DataLoader;
pub use data::DataSet;
pub use data::DataSetId;
pub use data::DataStore;
pub use data::KeyForm;
pub use data::LoadErrorLog;
pub use data::LoadOutcome;
pub use error::ArgumentError;
pub use error::PredicateFailure;
pub use error::PredicateResult;
pub use error::ValidationError;
pub use error::ValidatorError;
pub use error::ValidatorResult;
pub use key::RequiredFiles;
pub use key::SearchKey;
pub use validator::Validator;

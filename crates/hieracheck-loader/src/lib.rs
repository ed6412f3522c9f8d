// crates/hieracheck-loader/src/lib.rs
// ============================================================================
// Module: Hieracheck Loader Library
// Description: Directory loader and configuration for layer data files.
// Purpose: Feed hieracheck validators from YAML/JSON files on disk.
// Dependencies: hieracheck-core, serde, serde_json, serde_yaml, toml, walkdir
// ============================================================================

//! ## Overview
//! `hieracheck-loader` supplies the on-disk side of a validation run: it reads
//! a TOML configuration, walks a directory of layer files, and produces the
//! store and load-error log a [`hieracheck_core::Validator`] consumes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod loader;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuditConfig;
pub use config::AuditSinkKind;
pub use config::ConfigError;
pub use config::LoaderConfig;
pub use config::build_audit_sink;
pub use loader::YamlLoader;
pub use loader::validator_from_config;

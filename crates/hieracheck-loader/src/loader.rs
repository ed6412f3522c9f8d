// crates/hieracheck-loader/src/loader.rs
// ============================================================================
// Module: Layer Directory Loader
// Description: Discovers and parses YAML/JSON layer files into a data store.
// Purpose: Produce one load cycle (store + error log) for a validator.
// Dependencies: hieracheck-core, serde, serde_json, serde_yaml, walkdir
// ============================================================================

//! ## Overview
//! [`YamlLoader`] walks the configured directory recursively, picks files by
//! extension, and turns each file's top-level mapping into a data set named
//! after the file's base name (up to the first `.`). Problems with individual
//! files are recorded in the load-error log; they never abort the load, so
//! a test suite surfaces them through its first `validate` call rather than
//! at setup time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use hieracheck_core::DataKey;
use hieracheck_core::DataLoader;
use hieracheck_core::DataSet;
use hieracheck_core::DataStore;
use hieracheck_core::LoadOutcome;
use hieracheck_core::Validator;
use serde::Deserialize;
use serde_json::Value;
use serde_yaml::Value as YamlValue;
use walkdir::WalkDir;

use crate::config::ConfigError;
use crate::config::LoaderConfig;
use crate::config::build_audit_sink;

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Loader for directories of YAML (and JSON) layer files.
#[derive(Debug, Clone)]
pub struct YamlLoader {
    /// Validated loader configuration.
    config: LoaderConfig,
    /// Extensions with a leading dot.
    extensions: Vec<String>,
}

impl YamlLoader {
    /// Creates a loader from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn new(config: LoaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let extensions = config.normalized_extensions();
        Ok(Self {
            config,
            extensions,
        })
    }

    /// Creates a loader for `directory` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the directory path is invalid.
    pub fn for_directory(directory: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::new(LoaderConfig::new(directory))
    }

    /// Returns the loader configuration.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Lists candidate files in name order, plus any walk errors.
    #[must_use]
    pub fn discover(&self) -> (Vec<PathBuf>, Vec<String>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();
        for entry in WalkDir::new(&self.config.directory).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.wants(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err.path().unwrap_or(&self.config.directory).to_path_buf();
                    errors.push(format!("Error reading {}: {err}", path.display()));
                }
            }
        }
        (files, errors)
    }

    /// Returns true when the file extension is configured.
    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions.iter().any(|wanted| wanted.strip_prefix('.') == Some(ext))
            })
    }

    /// Loads one file into `store`, recording problems in `errors`.
    fn load_file(&self, path: &Path, store: &mut DataStore, errors: &mut Vec<String>) {
        let Some(id) = data_set_id(path) else {
            errors.push(format!(
                "Error in file {}: cannot derive a data set identifier",
                path.display()
            ));
            return;
        };
        let parsed = read_file_limited(path, self.config.max_file_bytes)
            .and_then(|content| parse_document(path, &content));
        match parsed {
            Err(detail) => errors.push(format!("Error in file {}: {detail}", path.display())),
            Ok(None) => {
                if !self.config.ignore_empty {
                    errors.push(format!("Yaml file is empty: {}", path.display()));
                }
            }
            Ok(Some(set)) => {
                if store.contains(&id) {
                    errors.push(format!("Duplicate data set {id}: {}", path.display()));
                } else {
                    store.insert(id, set);
                }
            }
        }
    }
}

impl DataLoader<Value> for YamlLoader {
    fn load(&self) -> LoadOutcome {
        let (files, mut errors) = self.discover();
        let mut store = DataStore::new();
        for file in &files {
            self.load_file(file, &mut store, &mut errors);
        }
        LoadOutcome {
            store,
            errors,
        }
    }
}

/// Builds a validator from configuration: audit sink, loader, one load.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration is invalid or the audit
/// sink cannot be opened. Per-file problems land in the validator's
/// load-error log instead.
pub fn validator_from_config(config: LoaderConfig) -> Result<Validator, ConfigError> {
    let audit = build_audit_sink(&config.audit)?;
    let loader = YamlLoader::new(config)?;
    let mut validator = Validator::new().with_audit_sink(audit);
    validator.load(&loader);
    Ok(validator)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Derives the data set identifier: the file name up to its first `.`.
fn data_set_id(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let id = name.split('.').next()?;
    if id.is_empty() { None } else { Some(id.to_string()) }
}

/// Reads a file while enforcing a maximum byte limit.
fn read_file_limited(path: &Path, max_bytes: usize) -> Result<Vec<u8>, String> {
    let file = File::open(path).map_err(|err| format!("unable to open file: {err}"))?;
    let mut buf = Vec::new();
    let limit = u64::try_from(max_bytes.saturating_add(1))
        .map_err(|_| "size limit exceeds u64".to_string())?;
    file.take(limit).read_to_end(&mut buf).map_err(|err| format!("unable to read file: {err}"))?;
    if buf.len() > max_bytes {
        return Err(format!("file exceeds size limit ({max_bytes} bytes)"));
    }
    Ok(buf)
}

/// Parses a document into a data set; `None` means the document is empty.
///
/// Only the first YAML document of a stream is read, with merge keys applied.
fn parse_document(path: &Path, content: &[u8]) -> Result<Option<DataSet>, String> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    if ext.eq_ignore_ascii_case("json") {
        let document: Value = serde_json::from_slice(content).map_err(|err| err.to_string())?;
        return match document {
            Value::Null => Ok(None),
            Value::Object(map) => {
                Ok(Some(map.into_iter().map(|(key, value)| (parse_key(&key), value)).collect()))
            }
            _ => Err(NOT_A_MAPPING.to_string()),
        };
    }
    let Some(document) = serde_yaml::Deserializer::from_slice(content).next() else {
        return Ok(None);
    };
    let mut document = YamlValue::deserialize(document).map_err(|err| err.to_string())?;
    document.apply_merge().map_err(|err| err.to_string())?;
    match document {
        YamlValue::Null => Ok(None),
        YamlValue::Mapping(mapping) => yaml_data_set(mapping).map(Some),
        _ => Err(NOT_A_MAPPING.to_string()),
    }
}

/// Detail recorded when a document's top level is not a mapping.
const NOT_A_MAPPING: &str = "top-level value must be a mapping";

/// Converts a YAML mapping into a data set with JSON values.
fn yaml_data_set(mapping: serde_yaml::Mapping) -> Result<DataSet, String> {
    let mut set = DataSet::new();
    for (key, value) in mapping {
        let key = yaml_key(&key)?;
        let value = serde_json::to_value(&value)
            .map_err(|err| format!("value of {key} cannot be represented: {err}"))?;
        set.insert(key, value);
    }
    Ok(set)
}

/// Converts a scalar YAML key into a data key.
fn yaml_key(key: &YamlValue) -> Result<DataKey, String> {
    match key {
        YamlValue::String(text) => Ok(parse_key(text)),
        YamlValue::Number(number) => Ok(DataKey::string(number.to_string())),
        YamlValue::Bool(flag) => Ok(DataKey::string(flag.to_string())),
        YamlValue::Tagged(tagged) => yaml_key(&tagged.value),
        _ => Err("top-level keys must be scalars".to_string()),
    }
}

/// Maps `:name` to a symbol-form key and anything else to a string key.
fn parse_key(text: &str) -> DataKey {
    match text.strip_prefix(':') {
        Some(name) if !name.is_empty() && !name.starts_with(':') => DataKey::symbol(name),
        _ => DataKey::string(text),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

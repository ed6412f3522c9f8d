// crates/hieracheck-loader/src/config.rs
// ============================================================================
// Module: Loader Configuration
// Description: Configuration loading and validation for the layer loader.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: hieracheck-core, serde, toml
// ============================================================================

//! ## Overview
//! Loader configuration is read from a TOML file with strict size and path
//! limits. The file names the layer directory, the extensions to pick up,
//! whether empty files are tolerated, and where audit events go.
//!
//! ```toml
//! directory = "tests/fixtures/hieradata"
//! extensions = ["yaml", "eyaml"]
//! ignore_empty = true
//!
//! [audit]
//! sink = "file"
//! path = "target/hieracheck-audit.jsonl"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use hieracheck_core::FileAuditSink;
use hieracheck_core::NoopAuditSink;
use hieracheck_core::StderrAuditSink;
use hieracheck_core::ValidationAuditSink;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "hieracheck.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "HIERACHECK_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured extensions.
pub(crate) const MAX_EXTENSIONS: usize = 32;
/// Default maximum size of a single data file in bytes.
pub(crate) const DEFAULT_MAX_FILE_BYTES: usize = 1024 * 1024;
/// Upper bound for the configurable data file size.
pub(crate) const MAX_MAX_FILE_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Layer loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Root directory searched recursively for data files.
    pub directory: PathBuf,
    /// File extensions to load, with or without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Skip empty files instead of recording a load error.
    #[serde(default)]
    pub ignore_empty: bool,
    /// Maximum size of a single data file, in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Audit event destination.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl LoaderConfig {
    /// Creates a configuration with defaults for everything but the directory.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            extensions: default_extensions(),
            ignore_empty: false,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            audit: AuditConfig::default(),
        }
    }

    /// Loads configuration from disk using the default resolution rules.
    ///
    /// A relative `directory` is resolved against the config file's parent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        if config.directory.is_relative()
            && let Some(parent) = resolved.parent()
        {
            config.directory = parent.join(&config.directory);
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("directory", &self.directory.to_string_lossy())?;
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("extensions must not be empty".to_string()));
        }
        if self.extensions.len() > MAX_EXTENSIONS {
            return Err(ConfigError::Invalid(format!(
                "extensions exceeds max entries ({MAX_EXTENSIONS})"
            )));
        }
        for extension in &self.extensions {
            validate_extension(extension)?;
        }
        if self.max_file_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_file_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_file_bytes > MAX_MAX_FILE_BYTES {
            return Err(ConfigError::Invalid("max_file_bytes exceeds limit".to_string()));
        }
        self.audit.validate()
    }

    /// Returns the configured extensions with a leading dot, deduplicated.
    #[must_use]
    pub fn normalized_extensions(&self) -> Vec<String> {
        let mut normalized: Vec<String> = Vec::with_capacity(self.extensions.len());
        for extension in &self.extensions {
            let trimmed = extension.trim();
            let dotted =
                if trimmed.starts_with('.') { trimmed.to_string() } else { format!(".{trimmed}") };
            if !normalized.contains(&dotted) {
                normalized.push(dotted);
            }
        }
        normalized
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `path`.
    File,
}

/// Audit event destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path (file sink only).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates the audit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path does not fit the sink.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires audit.path".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid with the file audit sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

/// Builds the audit sink described by `config`.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration is invalid or the audit log
/// cannot be opened.
pub fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn ValidationAuditSink>, ConfigError> {
    config.validate()?;
    match (config.sink, &config.path) {
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
            Ok(Arc::new(sink))
        }
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        _ => Ok(Arc::new(NoopAuditSink)),
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default extension list.
fn default_extensions() -> Vec<String> {
    vec!["yaml".to_string(), "yml".to_string()]
}

/// Default maximum data file size.
const fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

/// Resolves the config path from caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates one configured extension.
fn validate_extension(extension: &str) -> Result<(), ConfigError> {
    let trimmed = extension.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if bare.is_empty() {
        return Err(ConfigError::Invalid("extensions entries must be non-empty".to_string()));
    }
    if bare.contains(['/', '\\', '.']) || bare.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("invalid extension: {trimmed}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

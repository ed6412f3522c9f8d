// crates/hieracheck-core/src/key.rs
// ============================================================================
// Module: Search Keys
// Description: Exact and pattern search keys plus required-file sets.
// Purpose: Resolve call arguments once so the scan loop never inspects types.
// Dependencies: regex, serde_json
// ============================================================================

//! ## Overview
//! A [`SearchKey`] is either an exact [`DataKey`] (matched by canonical name
//! across key forms) or a compiled pattern (matched against every top-level
//! key name). [`RequiredFiles`] names the data sets that must each contain a
//! match. Both offer `from_value` constructors for harnesses that receive
//! arguments as JSON; those constructors carry the argument-error contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::data::DataKey;
use crate::data::DataSet;
use crate::data::DataSetId;
use crate::data::KeyForm;
use crate::error::ArgumentError;

// ============================================================================
// SECTION: Search Key
// ============================================================================

/// Key descriptor for a validation call.
#[derive(Debug, Clone)]
pub enum SearchKey {
    /// Exact key; matches entries with the same canonical name in any form.
    Exact(DataKey),
    /// Pattern; matches every key whose name satisfies the expression.
    Pattern(Regex),
}

impl SearchKey {
    /// Creates an exact string-form key.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::Exact(DataKey::string(name))
    }

    /// Creates an exact symbol-form key.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Exact(DataKey::symbol(name))
    }

    /// Compiles a pattern key.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidPattern`] when the expression does not
    /// compile.
    pub fn pattern(source: &str) -> Result<Self, ArgumentError> {
        Regex::new(source)
            .map(Self::Pattern)
            .map_err(|err| ArgumentError::InvalidPattern(err.to_string()))
    }

    /// Builds a key from a loosely typed argument.
    ///
    /// Accepts a JSON string (exact string key), `{"symbol": name}` or
    /// `{"pattern": source}`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidKey`] for any other shape and
    /// [`ArgumentError::InvalidPattern`] for a pattern that does not compile.
    pub fn from_value(value: &Value) -> Result<Self, ArgumentError> {
        match value {
            Value::String(name) => Ok(Self::string(name.clone())),
            Value::Object(map) if map.len() == 1 => {
                match (map.get("symbol"), map.get("pattern")) {
                    (Some(Value::String(name)), None) => Ok(Self::symbol(name.clone())),
                    (None, Some(Value::String(source))) => Self::pattern(source),
                    _ => Err(ArgumentError::InvalidKey),
                }
            }
            _ => Err(ArgumentError::InvalidKey),
        }
    }

    /// Returns true for pattern keys.
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }

    /// Renders the key the way "no match" messages quote it:
    /// `"name"`, `:name`, or `/pattern/`.
    #[must_use]
    pub fn inspect(&self) -> String {
        match self {
            Self::Exact(key) => match key.form() {
                KeyForm::String => format!("\"{}\"", key.name().escape_debug()),
                KeyForm::Symbol => format!(":{}", key.name()),
            },
            Self::Pattern(regex) => format!("/{}/", pattern_source(regex)),
        }
    }

    /// Returns true when a stored key satisfies this search key.
    #[must_use]
    pub fn matches(&self, key: &DataKey) -> bool {
        match self {
            Self::Exact(wanted) => wanted.is_equivalent(key),
            Self::Pattern(regex) => regex.is_match(key.name()),
        }
    }

    /// Collects every entry in `set` matched by this key, in key order.
    #[must_use]
    pub fn find_in<'s, V>(&self, set: &'s DataSet<V>) -> Vec<(&'s DataKey, &'s V)> {
        match self {
            Self::Exact(wanted) => set.lookup(wanted.name()),
            Self::Pattern(_) => set.iter().filter(|(key, _)| self.matches(key)).collect(),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(key) => f.write_str(key.name()),
            Self::Pattern(regex) => write!(f, "/{}/", pattern_source(regex)),
        }
    }
}

impl From<&str> for SearchKey {
    fn from(name: &str) -> Self {
        Self::string(name)
    }
}

impl From<String> for SearchKey {
    fn from(name: String) -> Self {
        Self::string(name)
    }
}

impl From<DataKey> for SearchKey {
    fn from(key: DataKey) -> Self {
        Self::Exact(key)
    }
}

impl From<Regex> for SearchKey {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// Returns the pattern source with unescaped `/` delimiters escaped.
fn pattern_source(regex: &Regex) -> String {
    let mut rendered = String::with_capacity(regex.as_str().len());
    let mut escaped = false;
    for ch in regex.as_str().chars() {
        if ch == '/' && !escaped {
            rendered.push('\\');
        }
        escaped = ch == '\\' && !escaped;
        rendered.push(ch);
    }
    rendered
}

// ============================================================================
// SECTION: Required Files
// ============================================================================

/// Ordered set of data set identifiers that must each contain a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFiles(Vec<DataSetId>);

impl RequiredFiles {
    /// Creates a required-file list, preserving caller order.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DataSetId>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    /// Builds a required-file list from a loosely typed argument.
    ///
    /// `null` means no constraint. Entries may be strings or
    /// `{"symbol": name}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidRequiredFiles`] when the value is not
    /// an array or null, and [`ArgumentError::InvalidRequiredFile`] when an
    /// entry is not an identifier.
    pub fn from_value(value: &Value) -> Result<Option<Self>, ArgumentError> {
        let entries = match value {
            Value::Null => return Ok(None),
            Value::Array(entries) => entries,
            _ => return Err(ArgumentError::InvalidRequiredFiles),
        };
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            ids.push(required_file_id(entry)?);
        }
        Ok(Some(Self(ids)))
    }

    /// Returns the identifiers in caller order.
    #[must_use]
    pub fn ids(&self) -> &[DataSetId] {
        &self.0
    }

    /// Returns true when no file is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<DataSetId>> FromIterator<S> for RequiredFiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Extracts one required-file identifier from a JSON entry.
fn required_file_id(entry: &Value) -> Result<DataSetId, ArgumentError> {
    match entry {
        Value::String(id) => Ok(DataSetId::new(id.clone())),
        Value::Object(map) if map.len() == 1 => match map.get("symbol") {
            Some(Value::String(id)) => Ok(DataSetId::new(id.clone())),
            _ => Err(ArgumentError::InvalidRequiredFile),
        },
        _ => Err(ArgumentError::InvalidRequiredFile),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::json;

    use super::*;

    #[test]
    fn inspect_quotes_each_key_kind() {
        assert_eq!(SearchKey::from("cat").inspect(), "\"cat\"");
        assert_eq!(SearchKey::symbol("cat").inspect(), ":cat");
        assert_eq!(SearchKey::pattern("nonex").unwrap().inspect(), "/nonex/");
        assert_eq!(SearchKey::from("say \"hi\"").inspect(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn display_uses_bare_name() {
        assert_eq!(SearchKey::symbol("missmatch").to_string(), "missmatch");
        assert_eq!(SearchKey::pattern("at$").unwrap().to_string(), "/at$/");
    }

    #[test]
    fn pattern_rendering_escapes_slashes() {
        let key = SearchKey::pattern("a/b").unwrap();
        assert_eq!(key.inspect(), "/a\\/b/");
        assert_eq!(key.to_string(), "/a\\/b/");
        assert_eq!(SearchKey::pattern(r"a\/b").unwrap().inspect(), r"/a\/b/");
        assert_eq!(SearchKey::pattern(r"a\\/b").unwrap().inspect(), r"/a\\\/b/");
    }

    #[test]
    fn exact_key_matches_either_form() {
        let key = SearchKey::from("other");
        assert!(key.matches(&DataKey::symbol("other")));
        assert!(key.matches(&DataKey::string("other")));
        assert!(!key.matches(&DataKey::string("others")));
    }

    #[test]
    fn pattern_matches_symbol_names() {
        let key = SearchKey::pattern("oth").unwrap();
        assert!(key.matches(&DataKey::symbol("other")));
    }

    #[test]
    fn invalid_pattern_is_argument_error() {
        let err = SearchKey::pattern("(").unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidPattern(_)));
    }

    #[test]
    fn from_value_accepts_supported_shapes() {
        assert!(matches!(SearchKey::from_value(&json!("cat")), Ok(SearchKey::Exact(_))));
        let symbol = SearchKey::from_value(&json!({"symbol": "cat"})).unwrap();
        assert_eq!(symbol.inspect(), ":cat");
        assert!(SearchKey::from_value(&json!({"pattern": "at$"})).unwrap().is_pattern());
    }

    #[test]
    fn from_value_rejects_other_shapes() {
        for value in [json!(["key"]), json!(1), json!(null), json!({"symbol": 1}), json!({})] {
            assert_eq!(SearchKey::from_value(&value).unwrap_err(), ArgumentError::InvalidKey);
        }
    }

    #[test]
    fn required_files_from_value() {
        assert_eq!(RequiredFiles::from_value(&json!(null)).unwrap(), None);
        let files = RequiredFiles::from_value(&json!(["file2", {"symbol": "file3"}]))
            .unwrap()
            .unwrap();
        assert_eq!(files, RequiredFiles::new(["file2", "file3"]));
        assert_eq!(
            RequiredFiles::from_value(&json!("not-an-array")).unwrap_err(),
            ArgumentError::InvalidRequiredFiles
        );
        assert_eq!(
            RequiredFiles::from_value(&json!([1])).unwrap_err(),
            ArgumentError::InvalidRequiredFile
        );
    }
}

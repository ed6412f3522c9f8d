// crates/hieracheck-core/src/data.rs
// ============================================================================
// Module: Data Model
// Description: Data sets, data store, and the loader seam.
// Purpose: Hold one load cycle's worth of flat key/value data.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`DataStore`] maps data set identifiers to flat [`DataSet`] mappings.
//! Keys carry a [`KeyForm`] so string-keyed and symbol-keyed entries can be
//! stored side by side while lookups compare only the canonical name.
//! Values are opaque: the store is generic over the value type and never
//! inspects it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Representation a key was stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyForm {
    /// Plain string key (`"name"`).
    String,
    /// Symbol-style key (`:name`).
    Symbol,
}

impl KeyForm {
    /// Every key form, in lookup order.
    pub const ALL: [Self; 2] = [Self::String, Self::Symbol];
}

/// Top-level key of a data set.
///
/// # Invariants
/// - `name` is the canonical form; two keys with equal names are equivalent
///   for lookup regardless of [`KeyForm`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataKey {
    /// Canonical key name.
    name: String,
    /// Representation the key was stored under.
    form: KeyForm,
}

impl DataKey {
    /// Creates a key with an explicit form.
    #[must_use]
    pub fn new(name: impl Into<String>, form: KeyForm) -> Self {
        Self {
            name: name.into(),
            form,
        }
    }

    /// Creates a string-form key.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, KeyForm::String)
    }

    /// Creates a symbol-form key.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::new(name, KeyForm::Symbol)
    }

    /// Returns the canonical key name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored representation.
    #[must_use]
    pub const fn form(&self) -> KeyForm {
        self.form
    }

    /// Returns true when both keys normalize to the same name.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            KeyForm::String => f.write_str(&self.name),
            KeyForm::Symbol => write!(f, ":{}", self.name),
        }
    }
}

impl From<&str> for DataKey {
    fn from(name: &str) -> Self {
        Self::string(name)
    }
}

impl From<String> for DataKey {
    fn from(name: String) -> Self {
        Self::string(name)
    }
}

// ============================================================================
// SECTION: Data Set Identifiers
// ============================================================================

/// Unique identifier of a data set within a store (e.g. a file base name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSetId(String);

impl DataSetId {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DataSetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DataSetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DataSetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DataSetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for DataSetId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

// ============================================================================
// SECTION: Data Sets
// ============================================================================

/// Flat key/value mapping loaded from one logical source.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet<V = Value> {
    /// Top-level entries ordered by canonical name then form.
    entries: BTreeMap<DataKey, V>,
}

impl<V> Default for DataSet<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> DataSet<V> {
    /// Creates an empty data set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning any value previously stored under the
    /// exact same key and form.
    pub fn insert(&mut self, key: impl Into<DataKey>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Returns the value stored under the exact key and form.
    #[must_use]
    pub fn get(&self, key: &DataKey) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns every entry whose canonical name equals `name`, across all
    /// key forms.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Vec<(&DataKey, &V)> {
        KeyForm::ALL
            .iter()
            .filter_map(|form| self.entries.get_key_value(&DataKey::new(name, *form)))
            .collect()
    }

    /// Returns true when an entry with the canonical name exists.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        !self.lookup(name).is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, DataKey, V> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the data set holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V, K: Into<DataKey>> FromIterator<(K, V)> for DataSet<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(key, value)| (key.into(), value)).collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a DataSet<V> {
    type Item = (&'a DataKey, &'a V);
    type IntoIter = btree_map::Iter<'a, DataKey, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// SECTION: Data Store
// ============================================================================

/// All data sets produced by one load cycle, keyed by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DataStore<V = Value> {
    /// Data sets ordered by identifier.
    sets: BTreeMap<DataSetId, DataSet<V>>,
}

impl<V> Default for DataStore<V> {
    fn default() -> Self {
        Self {
            sets: BTreeMap::new(),
        }
    }
}

impl<V> DataStore<V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a data set, returning any set previously stored under the id.
    pub fn insert(&mut self, id: impl Into<DataSetId>, set: DataSet<V>) -> Option<DataSet<V>> {
        self.sets.insert(id.into(), set)
    }

    /// Returns the data set with the given identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DataSet<V>> {
        self.sets.get(id)
    }

    /// Returns true when a data set with the identifier exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sets.contains_key(id)
    }

    /// Iterates data sets in identifier order.
    pub fn iter(&self) -> btree_map::Iter<'_, DataSetId, DataSet<V>> {
        self.sets.iter()
    }

    /// Iterates identifiers in order.
    pub fn ids(&self) -> impl Iterator<Item = &DataSetId> {
        self.sets.keys()
    }

    /// Returns the number of data sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns true when no data set is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<V, I: Into<DataSetId>> FromIterator<(I, DataSet<V>)> for DataStore<V> {
    fn from_iter<T: IntoIterator<Item = (I, DataSet<V>)>>(iter: T) -> Self {
        Self {
            sets: iter.into_iter().map(|(id, set)| (id.into(), set)).collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a DataStore<V> {
    type Item = (&'a DataSetId, &'a DataSet<V>);
    type IntoIter = btree_map::Iter<'a, DataSetId, DataSet<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

// ============================================================================
// SECTION: Loader Seam
// ============================================================================

/// Ordered, human-readable problems encountered while loading.
pub type LoadErrorLog = Vec<String>;

/// Result of one load cycle: the store and its error log, produced together.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<V = Value> {
    /// Loaded data sets.
    pub store: DataStore<V>,
    /// Load-time problems; empty on success.
    pub errors: LoadErrorLog,
}

impl<V> LoadOutcome<V> {
    /// Creates an outcome with no load errors.
    #[must_use]
    pub const fn clean(store: DataStore<V>) -> Self {
        Self {
            store,
            errors: Vec::new(),
        }
    }

    /// Returns true when no load errors were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Produces a [`LoadOutcome`] for a validator.
///
/// Implementations own discovery and parsing; identifiers they emit must be
/// unique within one outcome. Problems are reported through the outcome's
/// error log rather than by failing the load.
pub trait DataLoader<V = Value> {
    /// Runs one load cycle.
    fn load(&self) -> LoadOutcome<V>;
}

// ============================================================================
// SECTION: Tests
// ============================================================================

//! Environment context for a document
//!
//! A document's directory may carry a dotenv file. Its variables are loaded
//! once into an [`EnvMap`], substituted into `${NAME}` placeholders and
//! overlaid on the process environment of every spawned block.

pub mod loader;
pub mod substitution;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

pub use loader::{load_env, load_env_file, parse_env};
pub use substitution::substitute_env;

/// Variable name to value mapping loaded from a dotenv file
///
/// Built once per working directory and read-only afterwards, so it can be
/// shared between concurrent readers without locking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvMap(BTreeMap<String, String>);

impl EnvMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a variable is defined
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no variables
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }
}

impl<K, V> FromIterator<(K, V)> for EnvMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for EnvMap {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

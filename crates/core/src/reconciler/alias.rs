//! Person-name alias table.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::config::ConfigError;

/// Many-to-one mapping of alternate spellings to a canonical name.
///
/// Loaded once before a batch and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    canonical: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `canonical -> [aliases]`. When an alias is listed under
    /// several canonical names the first one in sorted order wins.
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Self {
        let mut canonical = HashMap::new();
        for (name, aliases) in map {
            for alias in aliases {
                canonical.entry(alias).or_insert_with(|| name.clone());
            }
        }
        Self { canonical }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self::from_map(map))
    }

    /// Read the JSON side file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        Self::from_json_str(&json).map_err(|e| {
            ConfigError::ParseError(format!("alias table {}: {}", path.display(), e))
        })
    }

    /// The canonical name for `name`, or `name` itself.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.canonical.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

//! Lookup table from configured source names to adapters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::SourceAdapter;

/// Strip an adapter namespace prefix (`web.javbus` -> `javbus`).
pub fn bare_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, bare)| bare)
}

/// Registered adapters, keyed by bare name.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("adapters", &self.names())
            .finish()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its bare name, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        let name = bare_name(adapter.name()).to_string();
        self.adapters.insert(name, adapter);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Look up an adapter; namespaced names resolve to their bare form.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(bare_name(name)).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSourceAdapter;

    #[test]
    fn test_bare_name() {
        assert_eq!(bare_name("web.javbus"), "javbus");
        assert_eq!(bare_name("javdb"), "javdb");
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = SourceRegistry::new()
            .with(Arc::new(MockSourceAdapter::new("web.alpha")))
            .with(Arc::new(MockSourceAdapter::new("beta")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("web.beta").is_some());
        assert!(registry.get("gamma").is_none());
    }
}

//! In-memory toolkit store with built-in toolkits.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock},
};

use draftloom_core::{
    application::{ApplicationError, ports::ToolkitStore},
    domain::{ToolkitDefinition, ToolkitVersion},
    error::DraftloomResult,
};

use crate::builtin_toolkits;

/// Thread-safe in-memory toolkit catalogue.
///
/// Keyed by toolkit name; every published version is kept, since drafts
/// may still reference an old one while the store already carries a newer
/// release.
#[derive(Clone)]
pub struct InMemoryToolkitStore {
    inner: Arc<RwLock<HashMap<String, BTreeMap<ToolkitVersion, ToolkitDefinition>>>>,
}

impl InMemoryToolkitStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store with the built-in toolkits loaded.
    pub fn with_builtin() -> DraftloomResult<Self> {
        let store = Self::new();
        for toolkit in builtin_toolkits::all_toolkits() {
            store.publish(toolkit)?;
        }
        Ok(store)
    }

    /// Get a specific published version of a toolkit.
    pub fn find_version(
        &self,
        name: &str,
        version: ToolkitVersion,
    ) -> DraftloomResult<ToolkitDefinition> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner
            .get(name)
            .and_then(|versions| versions.get(&version))
            .cloned()
            .ok_or_else(|| {
                ApplicationError::ToolkitNotFound {
                    name: format!("{name}@{version}"),
                }
                .into()
            })
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryToolkitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolkitStore for InMemoryToolkitStore {
    fn list(&self) -> DraftloomResult<Vec<ToolkitDefinition>> {
        let inner = self.inner.read().map_err(lock_error)?;
        let mut latest: Vec<ToolkitDefinition> = inner
            .values()
            .filter_map(|versions| versions.values().next_back().cloned())
            .collect();
        latest.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(latest)
    }

    fn find(&self, name: &str) -> DraftloomResult<ToolkitDefinition> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner
            .get(name)
            .and_then(|versions| versions.values().next_back().cloned())
            .ok_or_else(|| {
                ApplicationError::ToolkitNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    fn publish(&self, toolkit: ToolkitDefinition) -> DraftloomResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        let versions = inner.entry(toolkit.name().to_string()).or_default();
        if versions.contains_key(&toolkit.version) {
            return Err(ApplicationError::StoreError {
                reason: format!(
                    "toolkit '{}' version '{}' is already published; versions are immutable",
                    toolkit.name(),
                    toolkit.version
                ),
            }
            .into());
        }
        versions.insert(toolkit.version, toolkit);
        Ok(())
    }
}

fn lock_error<T>(_: T) -> draftloom_core::error::DraftloomError {
    ApplicationError::StoreError {
        reason: "toolkit store lock was poisoned".into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftloom_core::domain::PatternSchema;

    fn toolkit(version: ToolkitVersion) -> ToolkitDefinition {
        ToolkitDefinition::new("tk1", version, PatternSchema::new("p1", "Service"))
    }

    #[test]
    fn find_returns_the_latest_version() {
        let store = InMemoryToolkitStore::new();
        store.publish(toolkit(ToolkitVersion::new(0, 1, 0))).unwrap();
        store.publish(toolkit(ToolkitVersion::new(0, 3, 0))).unwrap();
        store.publish(toolkit(ToolkitVersion::new(0, 2, 0))).unwrap();

        let found = store.find("Service").unwrap();
        assert_eq!(found.version, ToolkitVersion::new(0, 3, 0));
    }

    #[test]
    fn republishing_a_version_is_refused() {
        let store = InMemoryToolkitStore::new();
        store.publish(toolkit(ToolkitVersion::new(0, 1, 0))).unwrap();
        assert!(store.publish(toolkit(ToolkitVersion::new(0, 1, 0))).is_err());
    }

    #[test]
    fn old_versions_stay_reachable() {
        let store = InMemoryToolkitStore::new();
        store.publish(toolkit(ToolkitVersion::new(0, 1, 0))).unwrap();
        store.publish(toolkit(ToolkitVersion::new(0, 2, 0))).unwrap();

        let old = store
            .find_version("Service", ToolkitVersion::new(0, 1, 0))
            .unwrap();
        assert_eq!(old.version, ToolkitVersion::new(0, 1, 0));
    }

    #[test]
    fn builtin_toolkits_load() {
        let store = InMemoryToolkitStore::with_builtin().unwrap();
        assert!(!store.is_empty());
    }
}

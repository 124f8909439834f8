//! In-memory draft store for tests and ephemeral sessions.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use draftloom_core::{
    application::{ApplicationError, ports::DraftStore},
    domain::DraftDefinition,
    error::DraftloomResult,
};

/// Thread-safe in-memory draft store.
#[derive(Clone, Default)]
pub struct MemoryDraftStore {
    inner: Arc<RwLock<HashMap<String, DraftDefinition>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, draft: &DraftDefinition) -> DraftloomResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        inner.insert(draft.name().to_string(), draft.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> DraftloomResult<DraftDefinition> {
        let inner = self.inner.read().map_err(lock_error)?;
        let mut draft = inner
            .get(name)
            .cloned()
            .ok_or_else(|| ApplicationError::DraftNotFound {
                name: name.to_string(),
            })?;
        // Kept symmetrical with the filesystem store: callers always get a
        // rehydrated draft.
        draft.rehydrate();
        Ok(draft)
    }

    fn list(&self) -> DraftloomResult<Vec<String>> {
        let inner = self.inner.read().map_err(lock_error)?;
        let mut names: Vec<String> = inner.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> DraftloomResult<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        inner
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| {
                ApplicationError::DraftNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }
}

fn lock_error<T>(_: T) -> draftloom_core::error::DraftloomError {
    ApplicationError::StoreError {
        reason: "draft store lock was poisoned".into(),
    }
    .into()
}

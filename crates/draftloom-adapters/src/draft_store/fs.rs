//! Filesystem draft store: one JSON file per draft.

use std::io;
use std::path::{Path, PathBuf};

use draftloom_core::{
    application::{ApplicationError, ports::DraftStore},
    domain::DraftDefinition,
    error::{DraftloomError, DraftloomResult},
};
use tracing::debug;

/// Production draft store persisting drafts as pretty-printed JSON under a
/// root directory, keyed by draft name.
#[derive(Debug, Clone)]
pub struct FsDraftStore {
    root: PathBuf,
}

impl FsDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

impl DraftStore for FsDraftStore {
    fn save(&self, draft: &DraftDefinition) -> DraftloomResult<()> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| fs_error(&self.root, e, "create store directory"))?;
        let path = self.path_for(draft.name());
        let json = serde_json::to_string_pretty(draft).map_err(|e| {
            DraftloomError::from(ApplicationError::StoreError {
                reason: format!("failed to serialize draft '{}': {e}", draft.name()),
            })
        })?;
        std::fs::write(&path, json).map_err(|e| fs_error(&path, e, "write draft"))?;
        debug!(draft = draft.name(), path = %path.display(), "saved draft");
        Ok(())
    }

    fn load(&self, name: &str) -> DraftloomResult<DraftDefinition> {
        let path = self.path_for(name);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ApplicationError::DraftNotFound {
                    name: name.to_string(),
                }
                .into());
            }
            Err(e) => return Err(fs_error(&path, e, "read draft")),
        };
        let mut draft: DraftDefinition = serde_json::from_str(&json).map_err(|e| {
            DraftloomError::from(ApplicationError::StoreError {
                reason: format!("draft file '{}' is corrupt: {e}", path.display()),
            })
        })?;
        // Back-references are not persisted.
        draft.rehydrate();
        Ok(draft)
    }

    fn list(&self) -> DraftloomResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(fs_error(&self.root, e, "list drafts")),
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> DraftloomResult<()> {
        let path = self.path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ApplicationError::DraftNotFound {
                    name: name.to_string(),
                }
                .into())
            }
            Err(e) => Err(fs_error(&path, e, "delete draft")),
        }
    }
}

fn fs_error(path: &Path, e: io::Error, operation: &str) -> DraftloomError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("failed to {operation}: {e}"),
    }
    .into()
}

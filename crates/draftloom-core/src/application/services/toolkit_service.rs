//! Toolkit service - toolkit catalogue use cases.

use tracing::instrument;

use crate::application::ports::ToolkitStore;
use crate::domain::ToolkitDefinition;
use crate::error::DraftloomResult;

/// Summary of an installed toolkit for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitInfo {
    pub id: String,
    pub name: String,
    pub version: String,
}

/// Read/publish access to the toolkit catalogue.
pub struct ToolkitService {
    store: Box<dyn ToolkitStore>,
}

impl ToolkitService {
    pub fn new(store: Box<dyn ToolkitStore>) -> Self {
        Self { store }
    }

    /// List the latest version of every installed toolkit.
    pub fn list(&self) -> DraftloomResult<Vec<ToolkitInfo>> {
        let toolkits = self.store.list()?;
        Ok(toolkits
            .into_iter()
            .map(|t| ToolkitInfo {
                id: t.id.clone(),
                name: t.name().to_string(),
                version: t.version.to_string(),
            })
            .collect())
    }

    pub fn find(&self, name: &str) -> DraftloomResult<ToolkitDefinition> {
        self.store.find(name)
    }

    /// Install a new toolkit version.
    #[instrument(skip(self, toolkit), fields(toolkit = %toolkit.name(), version = %toolkit.version))]
    pub fn publish(&self, toolkit: ToolkitDefinition) -> DraftloomResult<()> {
        self.store.publish(toolkit)
    }
}

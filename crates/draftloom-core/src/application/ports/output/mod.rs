//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from the outside world.
//! The `draftloom-adapters` crate provides implementations.

use crate::domain::{
    CommandExecutableContext, DraftDefinition, LazyItemMap, NodeId, ToolkitDefinition,
};
use crate::error::DraftloomResult;

/// Port for toolkit storage and retrieval.
///
/// Implemented by:
/// - `draftloom_adapters::toolkit_store::InMemoryToolkitStore` (built-in toolkits, testing)
pub trait ToolkitStore: Send + Sync {
    /// List the latest version of every installed toolkit.
    fn list(&self) -> DraftloomResult<Vec<ToolkitDefinition>>;

    /// Get the latest version of a toolkit by name.
    fn find(&self, name: &str) -> DraftloomResult<ToolkitDefinition>;

    /// Install a new toolkit version. Versions are immutable; publishing
    /// the same version twice is a store error.
    fn publish(&self, toolkit: ToolkitDefinition) -> DraftloomResult<()>;
}

/// Port for draft persistence.
///
/// Implemented by:
/// - `draftloom_adapters::draft_store::FsDraftStore` (JSON files, production)
pub trait DraftStore: Send + Sync {
    /// Persist a draft, overwriting any previous state.
    fn save(&self, draft: &DraftDefinition) -> DraftloomResult<()>;

    /// Load a draft by name. Implementations must return a fully
    /// rehydrated draft (ancestry populated).
    fn load(&self, name: &str) -> DraftloomResult<DraftDefinition>;

    /// Names of all persisted drafts.
    fn list(&self) -> DraftloomResult<Vec<String>>;

    fn delete(&self, name: &str) -> DraftloomResult<()>;
}

/// Port for resolving `{Pattern.Element.Attribute}` expressions to nodes.
///
/// Implemented by:
/// - `draftloom_adapters::path_resolver::ExpressionPathResolver`
pub trait DraftPathResolver: Send + Sync {
    fn resolve(&self, draft: &DraftDefinition, expression: &str) -> DraftloomResult<NodeId>;
}

/// Port for rendering text templates against a projected configuration.
///
/// Implemented by:
/// - `draftloom_adapters::renderer::ProjectionRenderer` (`{{...}}` substitution)
pub trait TextRenderer: Send + Sync {
    fn render(&self, template: &str, scope: &LazyItemMap<'_>) -> DraftloomResult<String>;
}

/// What an executed automation command reports back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationOutcome {
    /// Human-readable log lines, in execution order.
    pub log: Vec<String>,
}

impl AutomationOutcome {
    pub fn line(message: impl Into<String>) -> Self {
        Self {
            log: vec![message.into()],
        }
    }
}

/// Port for launching automation commands.
///
/// Implemented by:
/// - `draftloom_adapters::automation::ProcessAutomationExecutor`
///
/// Takes the draft mutably: code-template commands record artifact links
/// on the target item.
pub trait AutomationExecutor: Send + Sync {
    fn execute(
        &self,
        draft: &mut DraftDefinition,
        context: &CommandExecutableContext,
    ) -> DraftloomResult<AutomationOutcome>;
}

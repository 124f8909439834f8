//! Draft service - the main application orchestrator.
//!
//! Coordinates the draft lifecycle use cases: create from a toolkit,
//! configure, validate, upgrade, and run automation. The service loads a
//! draft from the store, applies one domain operation, and saves it back;
//! all business rules live in `crate::domain`.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{AutomationExecutor, AutomationOutcome, DraftPathResolver, DraftStore, ToolkitStore},
    },
    domain::{
        CommandPreparation, DraftDefinition, DraftUpgradeResult, NodeId, SchemaKind,
        ValidationResults,
    },
    error::DraftloomResult,
};

/// Outcome of a `run` use case.
#[derive(Debug, Clone)]
pub enum CommandRunOutcome {
    /// The command executed; its log is attached.
    Executed(AutomationOutcome),
    /// The draft failed validation and nothing was executed.
    Invalid(ValidationResults),
}

/// Main draft lifecycle service.
pub struct DraftService {
    toolkits: Box<dyn ToolkitStore>,
    drafts: Box<dyn DraftStore>,
    resolver: Box<dyn DraftPathResolver>,
    executor: Box<dyn AutomationExecutor>,
}

impl DraftService {
    pub fn new(
        toolkits: Box<dyn ToolkitStore>,
        drafts: Box<dyn DraftStore>,
        resolver: Box<dyn DraftPathResolver>,
        executor: Box<dyn AutomationExecutor>,
    ) -> Self {
        Self {
            toolkits,
            drafts,
            resolver,
            executor,
        }
    }

    /// Create a new draft from the latest version of a toolkit.
    ///
    /// When no name is given, one is generated from the pattern name plus
    /// a random suffix.
    #[instrument(skip(self))]
    pub fn create(
        &self,
        toolkit_name: &str,
        draft_name: Option<&str>,
    ) -> DraftloomResult<DraftDefinition> {
        let toolkit = self.toolkits.find(toolkit_name)?;
        let name = match draft_name {
            Some(name) => name.to_string(),
            None => generated_name(toolkit.name()),
        };
        if self.drafts.list()?.iter().any(|n| *n == name) {
            return Err(ApplicationError::DraftExists { name }.into());
        }
        let draft = DraftDefinition::new(name, toolkit);
        self.drafts.save(&draft)?;
        Ok(draft)
    }

    /// Load a draft for display.
    pub fn get(&self, draft_name: &str) -> DraftloomResult<DraftDefinition> {
        self.drafts.load(draft_name)
    }

    /// Names of all drafts in the store.
    pub fn list(&self) -> DraftloomResult<Vec<String>> {
        self.drafts.list()
    }

    pub fn delete(&self, draft_name: &str) -> DraftloomResult<()> {
        self.drafts.delete(draft_name)
    }

    /// Assign attribute values on the item at `expression` (or the pattern
    /// root when no expression is given).
    #[instrument(skip(self, assignments))]
    pub fn configure(
        &self,
        draft_name: &str,
        expression: Option<&str>,
        assignments: &[(String, String)],
    ) -> DraftloomResult<DraftDefinition> {
        let mut draft = self.drafts.load(draft_name)?;
        let target = self.target_of(&draft, expression)?;
        draft.set_properties(target, assignments)?;
        self.drafts.save(&draft)?;
        Ok(draft)
    }

    /// Materialise the item at `expression`: collections get a new item,
    /// everything else is materialised in place.
    #[instrument(skip(self))]
    pub fn add(&self, draft_name: &str, expression: &str) -> DraftloomResult<(DraftDefinition, NodeId)> {
        let mut draft = self.drafts.load(draft_name)?;
        let target = self.resolver.resolve(&draft, expression)?;
        let affected = if draft.tree().item(target).kind() == SchemaKind::Collection {
            draft.add_collection_item(target)?
        } else {
            draft.materialise(target, None)?;
            target
        };
        self.drafts.save(&draft)?;
        Ok((draft, affected))
    }

    /// Unmaterialise the item at `expression` (removes collection items).
    #[instrument(skip(self))]
    pub fn remove(&self, draft_name: &str, expression: &str) -> DraftloomResult<DraftDefinition> {
        let mut draft = self.drafts.load(draft_name)?;
        let target = self.resolver.resolve(&draft, expression)?;
        draft.unmaterialise(target)?;
        self.drafts.save(&draft)?;
        Ok(draft)
    }

    /// Validate the draft, or just the subtree at `expression`.
    #[instrument(skip(self))]
    pub fn validate(
        &self,
        draft_name: &str,
        expression: Option<&str>,
    ) -> DraftloomResult<ValidationResults> {
        let mut draft = self.drafts.load(draft_name)?;
        let target = self.target_of(&draft, expression)?;
        Ok(draft.validate(target)?)
    }

    /// Upgrade a draft to the latest installed version of its toolkit.
    /// A refused upgrade is reported in the result, not as an error, and
    /// leaves the stored draft untouched.
    #[instrument(skip(self))]
    pub fn upgrade(&self, draft_name: &str, force: bool) -> DraftloomResult<DraftUpgradeResult> {
        let mut draft = self.drafts.load(draft_name)?;
        let latest = self.toolkits.find(draft.toolkit().name())?;
        let result = draft.upgrade(latest, force);
        if result.succeeded() {
            self.drafts.save(&draft)?;
        }
        Ok(result)
    }

    /// Run a launchable command declared on the item at `expression` (or
    /// the pattern root). The draft must validate as a whole first.
    #[instrument(skip(self))]
    pub fn run(
        &self,
        draft_name: &str,
        expression: Option<&str>,
        command: &str,
    ) -> DraftloomResult<CommandRunOutcome> {
        let mut draft = self.drafts.load(draft_name)?;
        let target = self.target_of(&draft, expression)?;
        match draft.prepare_command(target, command)? {
            CommandPreparation::ValidationFailed(results) => {
                info!(draft = draft_name, "command refused, draft is invalid");
                Ok(CommandRunOutcome::Invalid(results))
            }
            CommandPreparation::Ready(context) => {
                let outcome = self.executor.execute(&mut draft, &context)?;
                // Execution may have recorded artifact links.
                self.drafts.save(&draft)?;
                Ok(CommandRunOutcome::Executed(outcome))
            }
        }
    }

    fn target_of(
        &self,
        draft: &DraftDefinition,
        expression: Option<&str>,
    ) -> DraftloomResult<NodeId> {
        match expression {
            Some(expression) => self.resolver.resolve(draft, expression),
            None => Ok(draft.root()),
        }
    }
}

fn generated_name(pattern_name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", pattern_name.to_lowercase(), &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_use_the_pattern_name() {
        let name = generated_name("WebService");
        assert!(name.starts_with("webservice-"));
        assert_eq!(name.len(), "webservice-".len() + 8);
        assert_ne!(name, generated_name("WebService"));
    }
}

//! The draft aggregate.
//!
//! A [`DraftDefinition`] pairs an instance tree with the exact
//! [`ToolkitDefinition`] snapshot it was built against. The snapshot is
//! owned, not referenced by version: every schema resolution inside the
//! draft goes against this copy, which is what makes upgrades an explicit,
//! logged operation instead of a silent drift.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::draft::migrate::{self, DraftUpgradeResult, MigrationChange};
use crate::domain::draft::tree::{DraftTree, NodeId};
use crate::domain::draft::validate::{self, ValidationResults};
use crate::domain::draft::visit::{self, DraftVisitor};
use crate::domain::error::DomainError;
use crate::domain::schema::AutomationSchema;
use crate::domain::toolkit::ToolkitDefinition;

// ============================================================================
// Command preparation
// ============================================================================

/// Everything an executor needs to launch one automation command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandExecutableContext {
    pub draft_id: String,
    /// The node the command was resolved on.
    pub target: NodeId,
    pub target_path: String,
    pub automation: AutomationSchema,
}

/// Outcome of resolving a command against a draft.
///
/// A draft that fails validation cannot execute anything; that is a normal
/// answer, not an error, so it travels in the `Ok` channel.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandPreparation {
    Ready(CommandExecutableContext),
    ValidationFailed(ValidationResults),
}

// ============================================================================
// DraftDefinition
// ============================================================================

/// A named, persistent draft: one instance tree plus its toolkit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDefinition {
    id: String,
    name: String,
    toolkit: ToolkitDefinition,
    tree: DraftTree,
}

impl DraftDefinition {
    /// Create a new draft from a toolkit, with the pattern root and all
    /// auto-created descendants materialised.
    pub fn new(name: impl Into<String>, toolkit: ToolkitDefinition) -> Self {
        let mut tree = DraftTree::from_toolkit(&toolkit);
        tree.populate_ancestry();
        let draft = Self {
            id: Uuid::new_v4().simple().to_string(),
            name: name.into(),
            toolkit,
            tree,
        };
        info!(draft = %draft.name, toolkit = %draft.toolkit.name(), "created draft");
        draft
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn toolkit(&self) -> &ToolkitDefinition {
        &self.toolkit
    }

    pub fn tree(&self) -> &DraftTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DraftTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Restore invariants that are not persisted. Must run once after
    /// deserialization, before anything resolves paths.
    pub fn rehydrate(&mut self) {
        self.tree.populate_ancestry();
    }

    // ── Tree operations against the owned toolkit ─────────────────────────

    /// Materialise a node, optionally with an explicit attribute value.
    pub fn materialise(
        &mut self,
        node: NodeId,
        value: Option<crate::domain::schema::AttributeValue>,
    ) -> Result<(), DomainError> {
        let Self { toolkit, tree, .. } = self;
        tree.materialise(node, toolkit, value)
    }

    /// Append a new item to a collection node.
    pub fn add_collection_item(&mut self, node: NodeId) -> Result<NodeId, DomainError> {
        let Self { toolkit, tree, .. } = self;
        tree.materialise_collection_item(node, toolkit)
    }

    pub fn unmaterialise(&mut self, node: NodeId) -> Result<(), DomainError> {
        self.tree.unmaterialise(node)
    }

    /// Assign textual values to attribute properties of a composite node.
    pub fn set_properties(
        &mut self,
        node: NodeId,
        assignments: &[(String, String)],
    ) -> Result<(), DomainError> {
        let Self { toolkit, tree, .. } = self;
        tree.set_properties(node, toolkit, assignments)
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Validate the subtree rooted at `target` against the owned toolkit.
    pub fn validate(&mut self, target: NodeId) -> Result<ValidationResults, DomainError> {
        validate::validate_subtree(&mut self.tree, &self.toolkit, target)
    }

    // ── Automation ────────────────────────────────────────────────────────

    /// All launchable commands in the draft, paired with the node they are
    /// declared on. Unmaterialised placeholders are included — a command
    /// target is addressed by schema, not by configuration state.
    pub fn launchable_automation(&mut self) -> Vec<(NodeId, AutomationSchema)> {
        let Self { toolkit, tree, .. } = self;
        let mut aggregator = AutomationAggregator {
            toolkit,
            found: Vec::new(),
        };
        let root = tree.root();
        visit::accept(tree, root, &mut aggregator);
        aggregator.found
    }

    /// Find the node whose schema declares the given code template.
    pub fn find_code_template_owner(&mut self, template_id: &str) -> Option<NodeId> {
        let Self { toolkit, tree, .. } = self;
        let mut finder = CodeTemplateFinder {
            toolkit,
            template_id,
            found: None,
        };
        let root = tree.root();
        visit::accept(tree, root, &mut finder);
        finder.found
    }

    /// Resolve a launchable command by name on `target` and gate it behind
    /// whole-draft validation.
    pub fn prepare_command(
        &mut self,
        target: NodeId,
        name: &str,
    ) -> Result<CommandPreparation, DomainError> {
        let results = self.validate(self.root())?;
        if !results.is_valid() {
            return Ok(CommandPreparation::ValidationFailed(results));
        }

        let item = self.tree.item(target);
        let schema = item
            .schema()
            .resolve_composite(&self.toolkit)
            .ok_or_else(|| DomainError::UnknownAutomation {
                owner: item.name().to_string(),
                name: name.to_string(),
            })?;
        let automation = schema
            .find_automation(name)
            .filter(|a| a.launchable)
            .cloned()
            .ok_or_else(|| DomainError::UnknownAutomation {
                owner: item.name().to_string(),
                name: name.to_string(),
            })?;

        Ok(CommandPreparation::Ready(CommandExecutableContext {
            draft_id: self.id.clone(),
            target,
            target_path: self.tree.configure_path(target)?,
            automation,
        }))
    }

    // ── Upgrade ───────────────────────────────────────────────────────────

    /// Upgrade the draft to a newer version of its toolkit, migrating the
    /// tree in place.
    ///
    /// Policy:
    /// - a different toolkit, the same version, or a downgrade is refused;
    /// - a major-version bump is a breaking upgrade and is refused unless
    ///   `force` is set, in which case the forcing is logged;
    /// - a refused upgrade leaves the draft untouched and comes back with
    ///   `failed` set and an `Abort` entry explaining why.
    pub fn upgrade(&mut self, latest: ToolkitDefinition, force: bool) -> DraftUpgradeResult {
        let from = self.toolkit.version;
        let to = latest.version;
        let refuse = |message: String| DraftUpgradeResult {
            from,
            to,
            changes: vec![MigrationChange::abort(message)],
            failed: true,
        };

        if latest.id != self.toolkit.id {
            return refuse(format!(
                "toolkit '{}' is not the toolkit this draft was created from",
                latest.name()
            ));
        }
        if to == from {
            return refuse(format!("the draft is already on version '{from}'"));
        }
        if to < from {
            return refuse(format!(
                "cannot downgrade from version '{from}' to '{to}'"
            ));
        }

        let mut changes = Vec::new();
        if to.major() > from.major() {
            if !force {
                return refuse(format!(
                    "upgrading from '{from}' to '{to}' is a breaking change; it must be forced"
                ));
            }
            changes.push(MigrationChange::breaking(format!(
                "the upgrade from '{from}' to '{to}' was forced"
            )));
        }

        changes.extend(migrate::migrate_tree(&mut self.tree, &self.toolkit, &latest));
        self.toolkit = latest;
        info!(
            draft = %self.name,
            %from,
            %to,
            changes = changes.len(),
            "upgraded draft"
        );
        DraftUpgradeResult {
            from,
            to,
            changes,
            failed: false,
        }
    }
}

// ============================================================================
// Automation visitors
// ============================================================================

/// Collects every launchable command in the tree. Never aborts.
struct AutomationAggregator<'a> {
    toolkit: &'a ToolkitDefinition,
    found: Vec<(NodeId, AutomationSchema)>,
}

impl AutomationAggregator<'_> {
    fn collect(&mut self, tree: &DraftTree, node: NodeId) {
        if let Some(schema) = tree.item(node).schema().resolve_composite(self.toolkit) {
            for automation in schema.automation() {
                if automation.launchable {
                    self.found.push((node, automation.clone()));
                }
            }
        }
    }
}

impl DraftVisitor for AutomationAggregator<'_> {
    fn pattern_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.collect(tree, node);
        true
    }

    fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.collect(tree, node);
        true
    }

    fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.collect(tree, node);
        true
    }
}

/// Finds the first node declaring a code template, aborting the walk as
/// soon as it matches.
struct CodeTemplateFinder<'a> {
    toolkit: &'a ToolkitDefinition,
    template_id: &'a str,
    found: Option<NodeId>,
}

impl CodeTemplateFinder<'_> {
    fn check(&mut self, tree: &DraftTree, node: NodeId) -> bool {
        let declares = tree
            .item(node)
            .schema()
            .resolve_composite(self.toolkit)
            .is_some_and(|schema| schema.has_code_template(self.template_id));
        if declares {
            self.found = Some(node);
            return false;
        }
        true
    }
}

impl DraftVisitor for CodeTemplateFinder<'_> {
    fn pattern_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.check(tree, node)
    }

    fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.check(tree, node)
    }

    fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.check(tree, node)
    }
}

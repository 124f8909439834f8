//! In-place draft migration between toolkit versions.
//!
//! When a draft is upgraded, its instance tree was built against the *old*
//! schema and must be reshaped to fit the *new* one. The
//! [`SchemaMigrator`] visitor walks the tree once, resolving every node's
//! schema id against both toolkits and reconciling the differences:
//!
//! - a node whose schema id no longer resolves against the new toolkit has
//!   been deleted from the pattern, and its subtree is removed (breaking);
//! - a renamed attribute is destroyed and re-created under the new name,
//!   carrying its value coerced to the new data type (breaking); renamed
//!   composites keep their node and update the display name (non-breaking);
//! - attribute data-type and choice changes rewrite the value, falling back
//!   to the new default or null, never converting in place; default-value
//!   changes advance values that were still on the old default;
//! - schemas added to the pattern get fresh nodes: attributes materialised
//!   with their default, elements as unmaterialised placeholders
//!   (non-breaking).
//!
//! Structural removals are queued per nesting level and applied on exit, so
//! the walk never edits a child list it is iterating.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::draft::tree::{DraftTree, NodeId, SchemaKind};
use crate::domain::draft::visit::{self, DraftVisitor};
use crate::domain::schema::{AttributeSchema, AttributeValue};
use crate::domain::toolkit::{ToolkitDefinition, ToolkitVersion};

// ============================================================================
// Change log
// ============================================================================

/// Severity of a single migration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Applied automatically; no authored state was lost.
    NonBreaking,
    /// Applied, but authored state was removed or forced.
    Breaking,
    /// The upgrade was refused; nothing was applied.
    Abort,
}

/// One entry in an upgrade's change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationChange {
    pub kind: ChangeKind,
    pub message: String,
}

impl MigrationChange {
    pub fn non_breaking(message: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::NonBreaking,
            message: message.into(),
        }
    }

    pub fn breaking(message: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Breaking,
            message: message.into(),
        }
    }

    pub fn abort(message: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Abort,
            message: message.into(),
        }
    }
}

/// The outcome of a draft upgrade attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftUpgradeResult {
    pub from: ToolkitVersion,
    pub to: ToolkitVersion,
    pub changes: Vec<MigrationChange>,
    /// True when the upgrade was refused and the draft is unchanged.
    pub failed: bool,
}

impl DraftUpgradeResult {
    pub fn succeeded(&self) -> bool {
        !self.failed
    }
}

// ============================================================================
// Migration walk
// ============================================================================

/// Reshape `tree` from `current`'s schema to `latest`'s, returning the
/// change log. The tree is left resolving cleanly against `latest`.
pub fn migrate_tree(
    tree: &mut DraftTree,
    current: &ToolkitDefinition,
    latest: &ToolkitDefinition,
) -> Vec<MigrationChange> {
    let mut migrator = SchemaMigrator::new(current, latest);
    let root = tree.root();
    visit::accept(tree, root, &mut migrator);
    debug!(
        changes = migrator.changes.len(),
        from = %current.version,
        to = %latest.version,
        "migrated draft tree"
    );
    migrator.changes
}

/// Per-nesting-level migration state.
struct Frame {
    /// Property names to destroy when this level exits.
    deletions: Vec<String>,
    /// The level sits inside a subtree that is itself being deleted; skip
    /// diffing and logging, the whole subtree goes at once.
    in_deleted: bool,
}

struct SchemaMigrator<'a> {
    current: &'a ToolkitDefinition,
    latest: &'a ToolkitDefinition,
    changes: Vec<MigrationChange>,
    frames: Vec<Frame>,
}

impl<'a> SchemaMigrator<'a> {
    fn new(current: &'a ToolkitDefinition, latest: &'a ToolkitDefinition) -> Self {
        Self {
            current,
            latest,
            changes: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn in_deleted(&self) -> bool {
        self.frames.last().is_some_and(|f| f.in_deleted)
    }

    fn path_of(&self, tree: &DraftTree, node: NodeId) -> String {
        tree.configure_path(node)
            .unwrap_or_else(|_| tree.item(node).name().to_string())
    }

    /// Composite (element or collection) enter: detect deletion and rename,
    /// then open a new frame.
    fn composite_enter(&mut self, tree: &mut DraftTree, node: NodeId) {
        let parent_deleted = self.in_deleted();
        let mut deleted = parent_deleted;
        if !parent_deleted {
            match tree.item(node).schema().resolve_element(self.latest) {
                None => {
                    deleted = true;
                    // Collection items are removed with their collection,
                    // never queued by name against the grandparent.
                    if tree.item(node).kind() != SchemaKind::CollectionItem {
                        let path = self.path_of(tree, node);
                        self.changes.push(MigrationChange::breaking(format!(
                            "'{path}' was deleted from the pattern, and its configuration has been removed"
                        )));
                        if let Some(frame) = self.frames.last_mut() {
                            frame.deletions.push(tree.item(node).name().to_string());
                        }
                    }
                }
                Some(schema) => {
                    if schema.name != tree.item(node).name() {
                        let path = self.path_of(tree, node);
                        let new_name = schema.name.clone();
                        tree.rename_item(node, &new_name);
                        self.changes.push(MigrationChange::non_breaking(format!(
                            "'{path}' was renamed to '{new_name}'"
                        )));
                    }
                }
            }
        }
        self.frames.push(Frame {
            deletions: Vec::new(),
            in_deleted: deleted,
        });
    }

    /// Composite exit: apply queued deletions, then add nodes for schemas
    /// new in the latest toolkit.
    fn composite_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => return,
        };
        if frame.in_deleted {
            return;
        }
        for name in frame.deletions {
            tree.destroy_property(node, &name);
        }

        let Some(schema) = tree.item(node).schema().resolve_composite(self.latest) else {
            return;
        };
        let new_attributes: Vec<AttributeSchema> = schema
            .attributes()
            .iter()
            .filter(|a| !self.has_property_schema(tree, node, &a.id))
            .cloned()
            .collect();
        let new_elements: Vec<_> = schema
            .elements()
            .iter()
            .filter(|e| !self.has_property_schema(tree, node, &e.id))
            .cloned()
            .collect();

        let owner_path = self.path_of(tree, node);
        for attribute in new_attributes {
            let default = attribute.default_if_valid();
            tree.create_attribute_property(node, &attribute, default);
            self.changes.push(MigrationChange::non_breaking(format!(
                "attribute '{}' was added to '{owner_path}', with its default value",
                attribute.name
            )));
        }
        for element in new_elements {
            tree.create_element_property(node, &element);
            self.changes.push(MigrationChange::non_breaking(format!(
                "element '{}' was added to '{owner_path}'",
                element.name
            )));
        }
    }

    fn has_property_schema(&self, tree: &DraftTree, node: NodeId, schema_id: &str) -> bool {
        tree.properties(node)
            .iter()
            .any(|&child| tree.item(child).schema().schema_id == schema_id)
    }

    /// Reconcile one attribute node against its latest schema.
    ///
    /// The checks are independent and cumulative, applied in order over a
    /// local copy of the value: rename, data type, choices, default. A
    /// single attribute can produce several log entries in one migration.
    fn migrate_attribute(&mut self, tree: &mut DraftTree, node: NodeId) {
        let latest = match tree.item(node).schema().resolve_attribute(self.latest) {
            Some(schema) => schema.clone(),
            None => {
                let path = self.path_of(tree, node);
                self.changes.push(MigrationChange::breaking(format!(
                    "'{path}' was deleted from the pattern, and its configuration has been removed"
                )));
                if let Some(frame) = self.frames.last_mut() {
                    frame.deletions.push(tree.item(node).name().to_string());
                }
                return;
            }
        };
        let old = tree
            .item(node)
            .schema()
            .resolve_attribute(self.current)
            .cloned();
        let old_default = old.as_ref().and_then(|s| s.default_if_valid());
        let new_default = latest.default_if_valid();
        let mut node = node;

        // A renamed attribute is a new property: the old node is destroyed
        // and a fresh one created under the new name, carrying the old
        // value coerced to the new data type. The rest of the checks then
        // run against the replacement.
        if latest.name != tree.item(node).name() {
            let path = self.path_of(tree, node);
            match tree.immediate_parent(node) {
                Some(parent) => {
                    let old_name = tree.item(node).name().to_string();
                    let carried = tree
                        .item(node)
                        .value()
                        .and_then(|v| latest.data_type.convert(v));
                    tree.destroy_property(parent, &old_name);
                    node = tree.create_attribute_property(parent, &latest, carried);
                }
                // Only possible before ancestry population; degrade to an
                // in-place rename rather than losing the node.
                None => tree.rename_item(node, &latest.name),
            }
            self.changes.push(MigrationChange::breaking(format!(
                "'{path}' was renamed to '{}'; its configuration was moved to a new property",
                latest.name
            )));
        }

        let path = self.path_of(tree, node);

        // Placeholders have no value to reconcile; the one schema change
        // that reaches them is a moved default, which they are assigned
        // directly. A collection container's template slots are exempt:
        // they never hold values, items pick the new default up on
        // creation.
        if !tree.item(node).is_materialised() {
            let template_slot = tree
                .immediate_parent(node)
                .is_some_and(|parent| tree.item(parent).kind() == SchemaKind::Collection);
            if !template_slot && old_default != new_default {
                tree.set_attribute_value(node, new_default);
                self.changes.push(MigrationChange::non_breaking(format!(
                    "the default value of '{path}' changed; it was assigned the new default"
                )));
            }
            return;
        }

        let mut value = tree.item(node).value().cloned();
        let mut changed = false;

        if old.as_ref().is_some_and(|s| s.data_type != latest.data_type) {
            let kept = value.as_ref().is_none_or(|v| latest.data_type.validates(v));
            let outcome = if kept {
                "its value was kept".to_string()
            } else {
                value = new_default.clone();
                changed = true;
                match &value {
                    Some(d) => format!("its value was replaced by the new default '{d}'"),
                    None => "its value was cleared".to_string(),
                }
            };
            self.changes.push(MigrationChange::breaking(format!(
                "'{path}' changed its data type to '{}'; {outcome}",
                latest.data_type
            )));
        }

        let old_choices = old.as_ref().map(|s| s.choices.clone()).unwrap_or_default();
        match (old_choices.is_empty(), latest.choices.is_empty()) {
            (true, false) => {
                let cleared = value.as_ref().is_some_and(|v| !latest.choices.contains(v));
                if cleared {
                    value = None;
                    changed = true;
                }
                let outcome = if cleared {
                    "its value was cleared"
                } else {
                    "its value is among them"
                };
                self.changes.push(MigrationChange::non_breaking(format!(
                    "'{path}' now restricts its value to a set of choices; {outcome}"
                )));
            }
            (false, true) => {
                self.changes.push(MigrationChange::breaking(format!(
                    "'{path}' no longer restricts its value to a set of choices"
                )));
            }
            (false, false) if old_choices != latest.choices => {
                let stale = value.clone().filter(|v| !latest.choices.contains(v));
                if let Some(old_value) = stale {
                    // A valid new default is guaranteed to be a member of
                    // the new choice set.
                    let outcome = match &new_default {
                        Some(d) => format!("'{old_value}' was replaced by the new default '{d}'"),
                        None => format!("'{old_value}' was cleared"),
                    };
                    value = new_default.clone();
                    changed = true;
                    self.changes.push(MigrationChange::breaking(format!(
                        "the allowed choices of '{path}' changed; {outcome}"
                    )));
                }
            }
            _ => {}
        }

        if old_default != new_default && (value.is_none() || value == old_default) {
            value = new_default.clone();
            changed = true;
            self.changes.push(MigrationChange::non_breaking(format!(
                "the default value of '{path}' changed; its value now follows the new default"
            )));
        }

        if changed {
            tree.set_attribute_value(node, value);
        }
    }
}

impl DraftVisitor for SchemaMigrator<'_> {
    fn pattern_enter(&mut self, _tree: &mut DraftTree, _node: NodeId) -> bool {
        // The pattern root always resolves; its schema id is stable across
        // versions of the same toolkit.
        self.frames.push(Frame {
            deletions: Vec::new(),
            in_deleted: false,
        });
        true
    }

    fn pattern_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        if self.latest.pattern.name != tree.item(node).name() {
            let new_name = self.latest.pattern.name.clone();
            let path = self.path_of(tree, node);
            tree.rename_item(node, &new_name);
            self.changes.push(MigrationChange::non_breaking(format!(
                "'{path}' was renamed to '{new_name}'"
            )));
        }
        self.composite_exit(tree, node);
    }

    fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.composite_enter(tree, node);
        true
    }

    fn element_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        self.composite_exit(tree, node);
    }

    fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.composite_enter(tree, node);
        true
    }

    fn collection_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        self.composite_exit(tree, node);
    }

    fn attribute(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        if !self.in_deleted() {
            self.migrate_attribute(tree, node);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{
        AttributeDataType, AttributeSchema, Cardinality, ElementSchema, PatternSchema,
    };

    fn base_toolkit() -> ToolkitDefinition {
        let mut pattern = PatternSchema::new("p1", "Service");
        pattern.attributes.push(
            AttributeSchema::new("a-name", "Name", AttributeDataType::String)
                .with_default(AttributeValue::String("unnamed".into())),
        );
        let mut api = ElementSchema::new("e-api", "Api", Cardinality::One);
        api.attributes.push(
            AttributeSchema::new("a-port", "Port", AttributeDataType::Integer)
                .with_default(AttributeValue::Integer(8080)),
        );
        pattern.elements.push(api);
        ToolkitDefinition::new("tk1", ToolkitVersion::new(0, 1, 0), pattern)
    }

    fn tree_for(toolkit: &ToolkitDefinition) -> DraftTree {
        let mut tree = DraftTree::from_toolkit(toolkit);
        tree.populate_ancestry();
        tree
    }

    #[test]
    fn unchanged_schema_produces_no_changes() {
        let current = base_toolkit();
        let latest = ToolkitDefinition {
            version: ToolkitVersion::new(0, 2, 0),
            ..current.clone()
        };
        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);
        assert!(changes.is_empty(), "unexpected: {changes:?}");
    }

    #[test]
    fn deleted_attribute_is_removed_as_breaking() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes.clear();

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        let api = tree.property(tree.root(), "Api").unwrap();
        assert!(tree.property(api, "Port").is_none());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Breaking);
        assert!(changes[0].message.contains("{Service.Api.Port}"));
    }

    #[test]
    fn deleted_element_removes_subtree_with_one_entry() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements.clear();

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        assert!(tree.property(tree.root(), "Api").is_none());
        // One breaking entry for the element, no noise for its attribute.
        let breaking: Vec<_> = changes.iter().filter(|c| c.kind == ChangeKind::Breaking).collect();
        assert_eq!(breaking.len(), 1);
        assert!(breaking[0].message.contains("{Service.Api}"));
    }

    #[test]
    fn added_attribute_materialises_with_default() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes.push(
            AttributeSchema::new("a-host", "Host", AttributeDataType::String)
                .with_default(AttributeValue::String("localhost".into())),
        );

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        let api = tree.property(tree.root(), "Api").unwrap();
        let host = tree.property(api, "Host").unwrap();
        assert!(tree.item(host).is_materialised());
        assert_eq!(
            tree.item(host).value(),
            Some(&AttributeValue::String("localhost".into()))
        );
        assert!(changes
            .iter()
            .any(|c| c.kind == ChangeKind::NonBreaking && c.message.contains("'Host' was added")));
    }

    #[test]
    fn added_element_appears_as_placeholder() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest
            .pattern
            .elements
            .push(ElementSchema::new("e-docs", "Docs", Cardinality::ZeroOrOne));

        let mut tree = tree_for(&current);
        migrate_tree(&mut tree, &current, &latest);

        let docs = tree.property(tree.root(), "Docs").unwrap();
        assert!(!tree.item(docs).is_materialised());
        // Ancestry of the new node is populated.
        assert_eq!(tree.immediate_parent(docs), Some(tree.root()));
    }

    #[test]
    fn renamed_attribute_is_recreated_under_the_new_name() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes[0].name = "ListenPort".into();

        let mut tree = tree_for(&current);
        let api = tree.property(tree.root(), "Api").unwrap();
        tree.set_properties(api, &current, &[("Port".into(), "9000".into())])
            .unwrap();
        let old_id = tree
            .item(tree.property(api, "Port").unwrap())
            .id()
            .to_string();

        let changes = migrate_tree(&mut tree, &current, &latest);

        assert!(tree.property(api, "Port").is_none());
        let port = tree.property(api, "ListenPort").unwrap();
        // A new property, not the old node under a new name.
        assert_ne!(tree.item(port).id(), old_id);
        assert_eq!(tree.item(port).value(), Some(&AttributeValue::Integer(9000)));
        assert!(changes
            .iter()
            .any(|c| c.kind == ChangeKind::Breaking && c.message.contains("renamed")));
    }

    #[test]
    fn type_change_is_breaking_and_replaces_the_value_with_the_new_default() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes[0] =
            AttributeSchema::new("a-port", "Port", AttributeDataType::String)
                .with_default(AttributeValue::String("none".into()));

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        // The integer 8080 is never converted to "8080"; it is replaced.
        let api = tree.property(tree.root(), "Api").unwrap();
        let port = tree.property(api, "Port").unwrap();
        assert_eq!(
            tree.item(port).value(),
            Some(&AttributeValue::String("none".into()))
        );
        assert!(changes
            .iter()
            .any(|c| c.kind == ChangeKind::Breaking && c.message.contains("data type")));
    }

    #[test]
    fn type_change_without_a_default_clears_the_value() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes[0] =
            AttributeSchema::new("a-port", "Port", AttributeDataType::Boolean);

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        let api = tree.property(tree.root(), "Api").unwrap();
        let port = tree.property(api, "Port").unwrap();
        assert_eq!(tree.item(port).value(), None);
        assert!(changes
            .iter()
            .any(|c| c.kind == ChangeKind::Breaking && c.message.contains("cleared")));
    }

    #[test]
    fn default_change_updates_values_still_on_the_old_default() {
        let current = base_toolkit();
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes[0].default_value = Some(AttributeValue::Integer(9090));

        // One tree still on the default, one with an authored value.
        let mut on_default = tree_for(&current);
        migrate_tree(&mut on_default, &current, &latest);
        let api = on_default.property(on_default.root(), "Api").unwrap();
        let port = on_default.property(api, "Port").unwrap();
        assert_eq!(
            on_default.item(port).value(),
            Some(&AttributeValue::Integer(9090))
        );

        let mut authored = tree_for(&current);
        let api = authored.property(authored.root(), "Api").unwrap();
        authored
            .set_properties(api, &current, &[("Port".into(), "3000".into())])
            .unwrap();
        let changes = migrate_tree(&mut authored, &current, &latest);
        let port = authored.property(api, "Port").unwrap();
        // Authored values are left alone.
        assert_eq!(
            authored.item(port).value(),
            Some(&AttributeValue::Integer(3000))
        );
        assert!(changes.is_empty());
    }

    fn env_toolkit(choices: &[&str], default: &str) -> ToolkitDefinition {
        let mut schema = AttributeSchema::new("a-env", "Env", AttributeDataType::String)
            .with_default(AttributeValue::String(default.into()));
        if !choices.is_empty() {
            schema = schema.with_choices(
                choices
                    .iter()
                    .map(|c| AttributeValue::String((*c).into()))
                    .collect(),
            );
        }
        let mut pattern = PatternSchema::new("p1", "Service");
        pattern.attributes.push(schema);
        ToolkitDefinition::new("tk1", ToolkitVersion::new(0, 1, 0), pattern)
    }

    fn env_value(tree: &DraftTree) -> Option<AttributeValue> {
        let env = tree.property(tree.root(), "Env").unwrap();
        tree.item(env).value().cloned()
    }

    #[test]
    fn choices_added_clear_a_value_outside_the_set() {
        let current = env_toolkit(&[], "dev");
        let mut latest = env_toolkit(&["dev", "prod"], "dev");
        latest.version = ToolkitVersion::new(0, 2, 0);

        let mut tree = tree_for(&current);
        let root = tree.root();
        tree.set_properties(root, &current, &[("Env".into(), "staging".into())])
            .unwrap();

        let changes = migrate_tree(&mut tree, &current, &latest);
        // Cleared to null, not reset to the default.
        assert_eq!(env_value(&tree), None);
        assert!(changes
            .iter()
            .any(|c| c.kind == ChangeKind::NonBreaking && c.message.contains("cleared")));
    }

    #[test]
    fn choices_removed_is_breaking_but_keeps_the_value() {
        let current = env_toolkit(&["dev", "prod"], "dev");
        let mut latest = env_toolkit(&[], "dev");
        latest.version = ToolkitVersion::new(0, 2, 0);

        let mut tree = tree_for(&current);
        let root = tree.root();
        tree.set_properties(root, &current, &[("Env".into(), "prod".into())])
            .unwrap();

        let changes = migrate_tree(&mut tree, &current, &latest);
        assert_eq!(env_value(&tree), Some(AttributeValue::String("prod".into())));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Breaking);
        assert!(changes[0].message.contains("no longer restricts"));
    }

    #[test]
    fn choices_change_replaces_a_stale_value_with_the_new_default() {
        let current = env_toolkit(&["dev", "prod"], "dev");
        let mut latest = env_toolkit(&["dev", "staging"], "dev");
        latest.version = ToolkitVersion::new(0, 2, 0);

        let mut tree = tree_for(&current);
        let root = tree.root();
        tree.set_properties(root, &current, &[("Env".into(), "prod".into())])
            .unwrap();

        let changes = migrate_tree(&mut tree, &current, &latest);
        assert_eq!(env_value(&tree), Some(AttributeValue::String("dev".into())));
        assert!(changes.iter().any(|c| {
            c.kind == ChangeKind::Breaking
                && c.message.contains("'prod' was replaced by the new default 'dev'")
        }));
    }

    #[test]
    fn choices_change_without_a_valid_default_clears_the_value() {
        let current = env_toolkit(&["dev", "prod"], "dev");
        // The new default is not itself a member of the new choice set, so
        // it is unusable as a replacement.
        let mut latest = env_toolkit(&["staging", "qa"], "dev");
        latest.version = ToolkitVersion::new(0, 2, 0);

        let mut tree = tree_for(&current);
        let root = tree.root();
        tree.set_properties(root, &current, &[("Env".into(), "prod".into())])
            .unwrap();

        let changes = migrate_tree(&mut tree, &current, &latest);
        assert_eq!(env_value(&tree), None);
        assert!(changes
            .iter()
            .any(|c| c.kind == ChangeKind::Breaking && c.message.contains("'prod' was cleared")));
    }

    #[test]
    fn choices_change_leaves_a_value_still_in_the_set_alone() {
        let current = env_toolkit(&["dev", "prod"], "dev");
        let mut latest = env_toolkit(&["dev", "prod", "staging"], "dev");
        latest.version = ToolkitVersion::new(0, 2, 0);

        let mut tree = tree_for(&current);
        let root = tree.root();
        tree.set_properties(root, &current, &[("Env".into(), "prod".into())])
            .unwrap();

        let changes = migrate_tree(&mut tree, &current, &latest);
        assert_eq!(env_value(&tree), Some(AttributeValue::String("prod".into())));
        assert!(changes.is_empty());
    }

    #[test]
    fn unmaterialised_attribute_is_assigned_the_new_default() {
        let mut pattern = PatternSchema::new("p1", "Service");
        let mut docs = ElementSchema::new("e-docs", "Docs", Cardinality::ZeroOrOne);
        docs.attributes.push(
            AttributeSchema::new("a-url", "Url", AttributeDataType::String)
                .with_default(AttributeValue::String("http://docs".into())),
        );
        pattern.elements.push(docs);
        let current = ToolkitDefinition::new("tk1", ToolkitVersion::new(0, 1, 0), pattern);

        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);
        latest.pattern.elements[0].attributes[0].default_value =
            Some(AttributeValue::String("http://new-docs".into()));

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        let docs = tree.property(tree.root(), "Docs").unwrap();
        let url = tree.property(docs, "Url").unwrap();
        assert_eq!(
            tree.item(url).value(),
            Some(&AttributeValue::String("http://new-docs".into()))
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::NonBreaking);
        assert!(changes[0].message.contains("assigned the new default"));
    }

    #[test]
    fn unmaterialised_attribute_with_an_unchanged_default_is_left_alone() {
        let mut pattern = PatternSchema::new("p1", "Service");
        let mut docs = ElementSchema::new("e-docs", "Docs", Cardinality::ZeroOrOne);
        docs.attributes.push(
            AttributeSchema::new("a-url", "Url", AttributeDataType::String)
                .with_default(AttributeValue::String("http://docs".into())),
        );
        pattern.elements.push(docs);
        let current = ToolkitDefinition::new("tk1", ToolkitVersion::new(0, 1, 0), pattern);
        let mut latest = current.clone();
        latest.version = ToolkitVersion::new(0, 2, 0);

        let mut tree = tree_for(&current);
        let changes = migrate_tree(&mut tree, &current, &latest);

        let docs = tree.property(tree.root(), "Docs").unwrap();
        let url = tree.property(docs, "Url").unwrap();
        assert!(!tree.item(url).is_materialised());
        assert_eq!(tree.item(url).value(), None);
        assert!(changes.is_empty());
    }
}

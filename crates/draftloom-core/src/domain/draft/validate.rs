//! Draft validation.
//!
//! Validation answers "is this draft a complete, well-formed instance of
//! its toolkit's pattern" without mutating anything. Violations are values,
//! not errors: an invalid draft is a normal state (authoring is
//! incremental), so the result is a [`ValidationResults`] collection that
//! the caller renders or gates on.

use serde::{Deserialize, Serialize};

use crate::domain::draft::tree::{DraftTree, NodeId, SchemaKind};
use crate::domain::draft::visit::{self, DraftVisitor};
use crate::domain::error::DomainError;
use crate::domain::toolkit::ToolkitDefinition;

/// A single rule failure, located by configuration path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub path: String,
    pub message: String,
}

/// The outcome of validating a subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResults {
    violations: Vec<ValidationViolation>,
}

impl ValidationResults {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[ValidationViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn add(&mut self, path: String, message: impl Into<String>) {
        self.violations.push(ValidationViolation {
            path,
            message: message.into(),
        });
    }
}

/// Validate the subtree rooted at `node` against `toolkit`.
pub fn validate_subtree(
    tree: &mut DraftTree,
    toolkit: &ToolkitDefinition,
    node: NodeId,
) -> Result<ValidationResults, DomainError> {
    let mut validator = SchemaValidator::new(toolkit);
    visit::accept(tree, node, &mut validator);
    validator.finish()
}

/// Visitor applying the schema's structural and value rules.
///
/// Rule set:
/// - A singular element that requires at least one instance must be
///   materialised.
/// - A collection that requires at least one instance must have an item;
///   this is checked whether or not the collection container itself is
///   materialised.
/// - A materialised attribute must satisfy its schema (required, type,
///   choices). Unmaterialised attributes are placeholders and are skipped.
struct SchemaValidator<'a> {
    toolkit: &'a ToolkitDefinition,
    results: ValidationResults,
    /// First internal failure (unresolvable path or schema); aborts the
    /// walk, distinct from ordinary violations.
    error: Option<DomainError>,
}

impl<'a> SchemaValidator<'a> {
    fn new(toolkit: &'a ToolkitDefinition) -> Self {
        Self {
            toolkit,
            results: ValidationResults::default(),
            error: None,
        }
    }

    fn finish(self) -> Result<ValidationResults, DomainError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.results),
        }
    }

    fn fail(&mut self, error: DomainError) -> bool {
        self.error = Some(error);
        false
    }

    fn path_of(&mut self, tree: &DraftTree, node: NodeId) -> Option<String> {
        match tree.configure_path(node) {
            Ok(path) => Some(path),
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }
}

impl DraftVisitor for SchemaValidator<'_> {
    fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        if tree.item(node).kind() != SchemaKind::Element {
            // Collection items exist by construction; nothing to check on
            // the item node itself.
            return true;
        }
        let schema = match tree.item(node).schema().resolve_element(self.toolkit) {
            Some(schema) => schema,
            None => {
                return self.fail(DomainError::UnknownSchema {
                    schema_id: tree.item(node).schema().schema_id.clone(),
                    toolkit: self.toolkit.name().to_string(),
                });
            }
        };
        if !tree.item(node).is_materialised() && schema.cardinality.requires_at_least_one() {
            let Some(path) = self.path_of(tree, node) else {
                return false;
            };
            self.results
                .add(path, "requires at least one instance".to_string());
        }
        // No duplicate-instance check for singular elements: a property
        // slot holds exactly one node per schema, so a second instance
        // cannot be represented in the tree.
        true
    }

    fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        let schema = match tree.item(node).schema().resolve_element(self.toolkit) {
            Some(schema) => schema,
            None => {
                return self.fail(DomainError::UnknownSchema {
                    schema_id: tree.item(node).schema().schema_id.clone(),
                    toolkit: self.toolkit.name().to_string(),
                });
            }
        };
        // Cardinality is enforced on the items, not on the container's own
        // materialisation state.
        let count = tree.items(node).len();
        if schema.cardinality.requires_at_least_one() && count == 0 {
            let Some(path) = self.path_of(tree, node) else {
                return false;
            };
            self.results
                .add(path, "requires at least one instance".to_string());
        }
        if schema.cardinality.limits_to_one() && count > 1 {
            let Some(path) = self.path_of(tree, node) else {
                return false;
            };
            self.results
                .add(path, "is limited to a single instance".to_string());
        }
        true
    }

    fn attribute(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        if !tree.item(node).is_materialised() {
            return true;
        }
        let schema = match tree.item(node).schema().resolve_attribute(self.toolkit) {
            Some(schema) => schema,
            None => {
                return self.fail(DomainError::UnknownSchema {
                    schema_id: tree.item(node).schema().schema_id.clone(),
                    toolkit: self.toolkit.name().to_string(),
                });
            }
        };
        let messages = schema.validate(tree.item(node).value());
        if !messages.is_empty() {
            let Some(path) = self.path_of(tree, node) else {
                return false;
            };
            for message in messages {
                self.results.add(path.clone(), message);
            }
        }
        true
    }
}

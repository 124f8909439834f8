//! Depth-first traversal of a draft tree.
//!
//! All tree walking in the engine goes through [`accept`]; validation,
//! migration, and automation discovery are visitor implementations, never
//! ad-hoc recursion.
//!
//! ## Protocol
//!
//! Composite nodes get an enter/exit pair; attribute leaves get a single
//! callback. Returning `false` from any enter (or the attribute callback)
//! aborts the traversal: the aborting node's children are skipped, pending
//! exits on the unwind path still run, and no further siblings are visited
//! anywhere up the stack. Collection items are structurally elements and are
//! routed through the element callbacks; the collection callbacks fire for
//! the ephemeral container itself.

use crate::domain::draft::tree::{DraftTree, NodeId, SchemaKind};

/// Visitor over a draft tree.
///
/// Every method defaults to a no-op that continues the walk, so
/// implementations only override the hooks they care about. Callbacks take
/// the tree mutably — migration rewrites nodes mid-walk.
pub trait DraftVisitor {
    fn pattern_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        let _ = (tree, node);
        true
    }

    fn pattern_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        let _ = (tree, node);
    }

    /// Entered for singular elements and collection items alike.
    fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        let _ = (tree, node);
        true
    }

    fn element_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        let _ = (tree, node);
    }

    fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        let _ = (tree, node);
        true
    }

    fn collection_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
        let _ = (tree, node);
    }

    fn attribute(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        let _ = (tree, node);
        true
    }
}

/// Walk the subtree rooted at `node` depth-first, children in declaration
/// order, collection properties before collection items.
///
/// Returns `false` if the traversal was aborted by a visitor callback.
pub fn accept<V: DraftVisitor + ?Sized>(
    tree: &mut DraftTree,
    node: NodeId,
    visitor: &mut V,
) -> bool {
    match tree.item(node).kind() {
        SchemaKind::Attribute => visitor.attribute(tree, node),
        SchemaKind::Pattern => {
            let keep_going = if visitor.pattern_enter(tree, node) {
                walk(tree, node, visitor, false)
            } else {
                false
            };
            visitor.pattern_exit(tree, node);
            keep_going
        }
        SchemaKind::Element | SchemaKind::CollectionItem => {
            let keep_going = if visitor.element_enter(tree, node) {
                walk(tree, node, visitor, false)
            } else {
                false
            };
            visitor.element_exit(tree, node);
            keep_going
        }
        SchemaKind::Collection => {
            let keep_going = if visitor.collection_enter(tree, node) {
                walk(tree, node, visitor, true)
            } else {
                false
            };
            visitor.collection_exit(tree, node);
            keep_going
        }
    }
}

fn walk<V: DraftVisitor + ?Sized>(
    tree: &mut DraftTree,
    node: NodeId,
    visitor: &mut V,
    include_items: bool,
) -> bool {
    // Child lists are snapshotted: visitors may add or remove properties of
    // the node being walked (migration does), and the walk sees the list as
    // it was on entry.
    for child in tree.properties(node).to_vec() {
        if !accept(tree, child, visitor) {
            return false;
        }
    }
    if include_items {
        for item in tree.items(node).to_vec() {
            if !accept(tree, item, visitor) {
                return false;
            }
        }
    }
    true
}

// ============================================================================
// AncestryPopulator
// ============================================================================

/// Rebuilds the parent back-references of a subtree.
///
/// Runs after construction and after every rehydration, since back-links
/// are never persisted. Maintains the current ancestor as a stack that
/// mirrors the enter/exit nesting.
pub struct AncestryPopulator {
    stack: Vec<NodeId>,
}

impl AncestryPopulator {
    /// Populate from a root node (the node itself gets no parent).
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Populate a freshly built subtree whose root hangs off `parent`.
    pub fn seeded(parent: NodeId) -> Self {
        Self {
            stack: vec![parent],
        }
    }

    fn link(&mut self, tree: &mut DraftTree, node: NodeId) {
        tree.set_parent(node, self.stack.last().copied());
    }
}

impl Default for AncestryPopulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftVisitor for AncestryPopulator {
    fn pattern_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.link(tree, node);
        self.stack.push(node);
        true
    }

    fn pattern_exit(&mut self, _tree: &mut DraftTree, _node: NodeId) {
        self.stack.pop();
    }

    fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.link(tree, node);
        self.stack.push(node);
        true
    }

    fn element_exit(&mut self, _tree: &mut DraftTree, _node: NodeId) {
        self.stack.pop();
    }

    fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.link(tree, node);
        self.stack.push(node);
        true
    }

    fn collection_exit(&mut self, _tree: &mut DraftTree, _node: NodeId) {
        self.stack.pop();
    }

    fn attribute(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
        self.link(tree, node);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{
        AttributeDataType, AttributeSchema, Cardinality, ElementSchema, PatternSchema,
    };
    use crate::domain::toolkit::{ToolkitDefinition, ToolkitVersion};

    fn toolkit() -> ToolkitDefinition {
        let mut pattern = PatternSchema::new("p1", "App");
        pattern
            .attributes
            .push(AttributeSchema::new("a1", "Title", AttributeDataType::String));
        let mut page = ElementSchema::new("e1", "Page", Cardinality::One);
        page.attributes
            .push(AttributeSchema::new("a2", "Slug", AttributeDataType::String));
        let widgets = ElementSchema::new("e2", "Widgets", Cardinality::ZeroOrMany);
        pattern.elements.push(page);
        pattern.elements.push(widgets);
        ToolkitDefinition::new("tk1", ToolkitVersion::new(0, 1, 0), pattern)
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        abort_on: Option<String>,
    }

    impl Recorder {
        fn note(&mut self, tree: &DraftTree, node: NodeId, event: &str) -> bool {
            let name = tree.item(node).name().to_string();
            self.events.push(format!("{event} {name}"));
            self.abort_on.as_deref() != Some(name.as_str())
        }
    }

    impl DraftVisitor for Recorder {
        fn pattern_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
            self.note(tree, node, "enter")
        }
        fn pattern_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
            self.note(tree, node, "exit");
        }
        fn element_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
            self.note(tree, node, "enter")
        }
        fn element_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
            self.note(tree, node, "exit");
        }
        fn collection_enter(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
            self.note(tree, node, "enter")
        }
        fn collection_exit(&mut self, tree: &mut DraftTree, node: NodeId) {
            self.note(tree, node, "exit");
        }
        fn attribute(&mut self, tree: &mut DraftTree, node: NodeId) -> bool {
            self.note(tree, node, "attr")
        }
    }

    #[test]
    fn walks_depth_first_in_declaration_order() {
        let toolkit = toolkit();
        let mut tree = DraftTree::from_toolkit(&toolkit);
        tree.populate_ancestry();

        let mut recorder = Recorder::default();
        let root = tree.root();
        assert!(accept(&mut tree, root, &mut recorder));

        assert_eq!(
            recorder.events,
            vec![
                "enter App",
                "attr Title",
                "enter Page",
                "attr Slug",
                "exit Page",
                "enter Widgets",
                "exit Widgets",
                "exit App",
            ]
        );
    }

    #[test]
    fn collection_items_are_visited_as_elements_after_properties() {
        let toolkit = toolkit();
        let mut tree = DraftTree::from_toolkit(&toolkit);
        tree.populate_ancestry();
        let widgets = tree.property(tree.root(), "Widgets").unwrap();
        tree.materialise_collection_item(widgets, &toolkit).unwrap();

        let mut recorder = Recorder::default();
        accept(&mut tree, widgets, &mut recorder);
        assert_eq!(
            recorder.events,
            vec!["enter Widgets", "enter Widgets", "exit Widgets", "exit Widgets"]
        );
    }

    #[test]
    fn abort_skips_children_and_siblings_but_runs_exits() {
        let toolkit = toolkit();
        let mut tree = DraftTree::from_toolkit(&toolkit);
        tree.populate_ancestry();

        let mut recorder = Recorder {
            abort_on: Some("Page".into()),
            ..Default::default()
        };
        let root = tree.root();
        assert!(!accept(&mut tree, root, &mut recorder));

        // Page's subtree and the Widgets sibling are skipped; the exits on
        // the unwind path still fire.
        assert_eq!(
            recorder.events,
            vec![
                "enter App",
                "attr Title",
                "enter Page",
                "exit Page",
                "exit App",
            ]
        );
    }

    #[test]
    fn populator_links_every_node() {
        let toolkit = toolkit();
        let mut tree = DraftTree::from_toolkit(&toolkit);
        tree.populate_ancestry();

        let root = tree.root();
        assert!(tree.immediate_parent(root).is_none());
        let page = tree.property(root, "Page").unwrap();
        assert_eq!(tree.immediate_parent(page), Some(root));
        let slug = tree.property(page, "Slug").unwrap();
        assert_eq!(tree.immediate_parent(slug), Some(page));
    }
}

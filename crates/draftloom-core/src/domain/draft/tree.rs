//! The draft item tree.
//!
//! A draft is a lazily-materialised instance of a toolkit's pattern schema.
//! Every node is a [`DraftItem`] with one of five structural kinds; the
//! whole tree lives in an arena owned by [`DraftTree`], with child links as
//! [`NodeId`] indices and the parent link as a non-owning back-reference.
//!
//! ## Ownership and ancestry
//!
//! The true ownership direction is strictly parent-to-child. The `parent`
//! field is a lookup-only back-reference: it is never serialized (persisting
//! it would cycle) and is set after construction or rehydration by the
//! `AncestryPopulator` visitor pass. Path resolution fails with an internal
//! error when that pass has not run — a caller-ordering bug, not a user
//! error.
//!
//! ## Materialisation
//!
//! A node that is not materialised is a schema-defined placeholder: it does
//! not "exist" in the configured instance, carries no value, and forces its
//! descendants unmaterialised. The auto-create policy re-materialises
//! children independently on the next materialisation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::draft::visit::{self, AncestryPopulator};
use crate::domain::error::DomainError;
use crate::domain::schema::{AttributeSchema, AttributeValue, CompositeSchema, ElementSchema};
use crate::domain::toolkit::ToolkitDefinition;

// ============================================================================
// Identity
// ============================================================================

/// Index of a node in its tree's arena.
///
/// Stable for the node's lifetime; slots of destroyed nodes are never
/// reused, the nodes simply become unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Generate a short instance id for a draft item.
///
/// Kept short (eight hex chars) because collection-item ids appear in
/// user-facing configuration paths.
fn new_instance_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

// ============================================================================
// DraftItemSchema - the tagged schema pointer
// ============================================================================

/// Structural role of a draft item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// The tree root; always exists, cannot be (un)materialised.
    Pattern,
    /// A singular, non-collection element.
    Element,
    /// The ephemeral container for a collection; operations act on its items.
    Collection,
    /// A materialised instance inside a collection, addressed by instance id.
    CollectionItem,
    /// A leaf holding a single typed value.
    Attribute,
}

impl SchemaKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Element => "element",
            Self::Collection => "collection",
            Self::CollectionItem => "collection item",
            Self::Attribute => "attribute",
        }
    }
}

/// A small tagged pointer to a node's schema: id plus structural kind.
///
/// Deliberately not a live schema reference — it resolves against a
/// toolkit's schema graph on demand, so a draft can be checked against its
/// *old* toolkit or a *new* one during migration. A resolution miss is only
/// an error when the caller says so (`require_*`); the optional resolvers
/// exist because a miss against a new toolkit is migration's deletion
/// signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItemSchema {
    pub schema_id: String,
    pub kind: SchemaKind,
}

impl DraftItemSchema {
    pub fn new(schema_id: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            schema_id: schema_id.into(),
            kind,
        }
    }

    /// Resolve to an element schema, if this id still exists in `toolkit`.
    pub fn resolve_element<'a>(&self, toolkit: &'a ToolkitDefinition) -> Option<&'a ElementSchema> {
        toolkit.pattern.find_element(&self.schema_id)
    }

    /// Resolve to an attribute schema, if this id still exists in `toolkit`.
    pub fn resolve_attribute<'a>(
        &self,
        toolkit: &'a ToolkitDefinition,
    ) -> Option<&'a AttributeSchema> {
        toolkit.pattern.find_attribute(&self.schema_id)
    }

    /// Resolve to the composite (pattern-or-element) schema view.
    pub fn resolve_composite<'a>(
        &self,
        toolkit: &'a ToolkitDefinition,
    ) -> Option<&'a dyn CompositeSchema> {
        match self.kind {
            SchemaKind::Pattern => {
                (toolkit.pattern.id == self.schema_id).then_some(&toolkit.pattern as _)
            }
            SchemaKind::Attribute => None,
            _ => self.resolve_element(toolkit).map(|e| e as _),
        }
    }

    pub fn require_composite<'a>(
        &self,
        toolkit: &'a ToolkitDefinition,
    ) -> Result<&'a dyn CompositeSchema, DomainError> {
        self.resolve_composite(toolkit)
            .ok_or_else(|| DomainError::UnknownSchema {
                schema_id: self.schema_id.clone(),
                toolkit: toolkit.name().to_string(),
            })
    }

    pub fn require_attribute<'a>(
        &self,
        toolkit: &'a ToolkitDefinition,
    ) -> Result<&'a AttributeSchema, DomainError> {
        self.resolve_attribute(toolkit)
            .ok_or_else(|| DomainError::UnknownSchema {
                schema_id: self.schema_id.clone(),
                toolkit: toolkit.name().to_string(),
            })
    }
}

// ============================================================================
// Artifact links
// ============================================================================

/// Record of a file artifact generated by an automation execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactLink {
    pub id: String,
    pub command_id: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ArtifactLink {
    pub fn new(command_id: impl Into<String>, path: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            id: new_instance_id(),
            command_id: command_id.into(),
            path: path.into(),
            tag,
        }
    }

    pub fn update_path_and_tag(&mut self, path: impl Into<String>, tag: Option<String>) {
        self.path = path.into();
        self.tag = tag;
    }
}

// ============================================================================
// DraftItem
// ============================================================================

/// Per-kind payload of a draft item.
///
/// The tagged union makes the "which fields are valid for this kind"
/// invariant unrepresentable: no node can mix an attribute value with a
/// child container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemState {
    /// Pattern, Element, and CollectionItem nodes: named children only.
    Composite { properties: Vec<NodeId> },
    /// Collection nodes: named children plus ordered collection items.
    Collection {
        properties: Vec<NodeId>,
        items: Vec<NodeId>,
    },
    /// Attribute leaves: a single optional typed value.
    Attribute { value: Option<AttributeValue> },
}

/// A node in a draft's instance tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItem {
    id: String,
    /// Denormalized copy of the schema's name, for path display. Kept in
    /// sync with schema renames by migration.
    name: String,
    schema: DraftItemSchema,
    is_materialised: bool,
    /// Non-owning back-reference; never persisted, set by ancestry
    /// population after construction or rehydration.
    #[serde(skip)]
    parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    artifact_links: Vec<ArtifactLink>,
    state: ItemState,
}

impl DraftItem {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &DraftItemSchema {
        &self.schema
    }

    pub fn kind(&self) -> SchemaKind {
        self.schema.kind
    }

    pub fn is_materialised(&self) -> bool {
        self.is_materialised
    }

    /// The attribute value; `None` for non-attribute nodes too.
    pub fn value(&self) -> Option<&AttributeValue> {
        match &self.state {
            ItemState::Attribute { value } => value.as_ref(),
            _ => None,
        }
    }

    pub fn artifact_links(&self) -> &[ArtifactLink] {
        &self.artifact_links
    }

    pub fn add_artifact_link(&mut self, link: ArtifactLink) {
        self.artifact_links.push(link);
    }

    pub fn artifact_link_mut(&mut self, link_id: &str) -> Option<&mut ArtifactLink> {
        self.artifact_links.iter_mut().find(|l| l.id == link_id)
    }

    fn set_value(&mut self, new_value: Option<AttributeValue>) {
        if let ItemState::Attribute { value } = &mut self.state {
            *value = new_value;
        }
    }
}

// ============================================================================
// DraftTree
// ============================================================================

/// Arena-owned draft instance tree.
///
/// All node access goes through the tree; `NodeId`s are only meaningful
/// against the tree that allocated them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftTree {
    nodes: Vec<DraftItem>,
    root: NodeId,
}

impl DraftTree {
    /// Construct a fresh instance tree for a toolkit's pattern, walking the
    /// whole schema recursively and applying the auto-create policy.
    ///
    /// Ancestry is *not* populated here; callers run the populator pass
    /// (the `DraftDefinition` constructor does this).
    pub fn from_toolkit(toolkit: &ToolkitDefinition) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        // The pattern root always exists.
        tree.root = tree.build_composite(&toolkit.pattern, SchemaKind::Pattern, true);
        tree
    }

    fn alloc(&mut self, item: DraftItem) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(item);
        id
    }

    /// Recursively construct a composite node and its schema-declared
    /// children. `materialised` cascades: an unmaterialised parent forces
    /// all descendants unmaterialised; a materialised parent gives its
    /// attributes their defaults and lets element children follow their own
    /// auto-create policy.
    fn build_composite(
        &mut self,
        schema: &dyn CompositeSchema,
        kind: SchemaKind,
        materialised: bool,
    ) -> NodeId {
        let mut properties = Vec::new();
        for attribute in schema.attributes() {
            let value = if materialised {
                attribute.default_if_valid()
            } else {
                None
            };
            properties.push(self.alloc(DraftItem {
                id: new_instance_id(),
                name: attribute.name.clone(),
                schema: DraftItemSchema::new(&attribute.id, SchemaKind::Attribute),
                is_materialised: materialised,
                parent: None,
                artifact_links: Vec::new(),
                state: ItemState::Attribute { value },
            }));
        }
        for child in schema.elements() {
            let child_kind = if child.is_collection() {
                SchemaKind::Collection
            } else {
                SchemaKind::Element
            };
            let child_materialised = materialised && child.should_auto_create();
            properties.push(self.build_composite(child, child_kind, child_materialised));
        }

        let state = if kind == SchemaKind::Collection {
            ItemState::Collection {
                properties,
                items: Vec::new(),
            }
        } else {
            ItemState::Composite { properties }
        };
        self.alloc(DraftItem {
            id: new_instance_id(),
            name: schema.schema_name().to_string(),
            schema: DraftItemSchema::new(schema.schema_id(), kind),
            is_materialised: materialised,
            parent: None,
            artifact_links: Vec::new(),
            state,
        })
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn item(&self, node: NodeId) -> &DraftItem {
        &self.nodes[node.index()]
    }

    pub fn item_mut(&mut self, node: NodeId) -> &mut DraftItem {
        &mut self.nodes[node.index()]
    }

    /// Named children, in schema declaration order. Empty for attributes.
    pub fn properties(&self, node: NodeId) -> &[NodeId] {
        match &self.item(node).state {
            ItemState::Composite { properties } | ItemState::Collection { properties, .. } => {
                properties
            }
            ItemState::Attribute { .. } => &[],
        }
    }

    /// Collection items, in insertion order. Empty for non-collections.
    pub fn items(&self, node: NodeId) -> &[NodeId] {
        match &self.item(node).state {
            ItemState::Collection { items, .. } => items,
            _ => &[],
        }
    }

    /// Look up a named child by its (denormalized) name.
    pub fn property(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.properties(node)
            .iter()
            .copied()
            .find(|&child| self.item(child).name() == name)
    }

    /// Find a reachable node by its instance id.
    pub fn find_by_item_id(&self, id: &str) -> Option<NodeId> {
        fn search(tree: &DraftTree, node: NodeId, id: &str) -> Option<NodeId> {
            if tree.item(node).id() == id {
                return Some(node);
            }
            for &child in tree.properties(node) {
                if let Some(found) = search(tree, child, id) {
                    return Some(found);
                }
            }
            for &item in tree.items(node) {
                if let Some(found) = search(tree, item, id) {
                    return Some(found);
                }
            }
            None
        }
        search(self, self.root, id)
    }

    /// The raw structural parent. `None` on the root, or before ancestry
    /// population has run.
    pub fn immediate_parent(&self, node: NodeId) -> Option<NodeId> {
        self.item(node).parent
    }

    /// The logical parent used for paths and property access: for a
    /// collection item this skips past its owning collection to that
    /// collection's own parent, so items read as hanging directly off the
    /// grandparent.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let immediate = self.immediate_parent(node)?;
        match self.item(node).kind() {
            SchemaKind::CollectionItem => self.immediate_parent(immediate),
            _ => Some(immediate),
        }
    }

    pub(crate) fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        self.item_mut(node).parent = parent;
    }

    /// Run the ancestry-population pass over the whole tree.
    ///
    /// Must be called once after rehydration (back-references are not
    /// persisted) before any path resolution or migration.
    pub fn populate_ancestry(&mut self) {
        let root = self.root;
        visit::accept(self, root, &mut AncestryPopulator::new());
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// The fully-qualified path of a node, walking logical parents upward.
    ///
    /// Collection items are addressed by instance id (multiple instances
    /// share a name), every other node by name.
    pub fn path(&self, node: NodeId) -> Result<String, DomainError> {
        let item = self.item(node);
        if item.kind() == SchemaKind::Pattern {
            return Ok(item.name().to_string());
        }
        let parent = self
            .parent(node)
            .ok_or_else(|| DomainError::AncestryNotPopulated {
                name: item.name().to_string(),
            })?;
        let parent_path = self.path(parent)?;
        match item.kind() {
            SchemaKind::CollectionItem => {
                Ok(format!("{}.{}.{}", parent_path, item.name(), item.id()))
            }
            _ => Ok(format!("{}.{}", parent_path, item.name())),
        }
    }

    /// The path wrapped in `{...}` delimiters — the expression syntax
    /// consumed by path resolvers.
    pub fn configure_path(&self, node: NodeId) -> Result<String, DomainError> {
        Ok(format!("{{{}}}", self.path(node)?))
    }

    // ── Materialisation ───────────────────────────────────────────────────

    /// Materialise a node, optionally assigning an attribute value.
    ///
    /// Fails on the pattern root (it always exists), and when a value is
    /// supplied for a non-attribute node. An explicit attribute value is
    /// preferred over the schema default, but only if it validates; invalid
    /// or absent values fall back to default-if-valid, else null.
    pub fn materialise(
        &mut self,
        node: NodeId,
        toolkit: &ToolkitDefinition,
        value: Option<AttributeValue>,
    ) -> Result<(), DomainError> {
        if node == self.root {
            return Err(DomainError::RootImmutable);
        }
        match self.item(node).kind() {
            SchemaKind::Attribute => {
                let schema = self.item(node).schema().require_attribute(toolkit)?;
                let resolved = schema.materialise_value(value);
                let item = self.item_mut(node);
                item.is_materialised = true;
                item.set_value(resolved);
                Ok(())
            }
            _ => {
                if value.is_some() {
                    return Err(self.structural_misuse("materialise with value", node));
                }
                self.materialise_cascade(node, toolkit)
            }
        }
    }

    /// Materialisation cascade: attributes take their defaults (keeping any
    /// value they already have), element children re-apply their own
    /// auto-create policy.
    fn materialise_cascade(
        &mut self,
        node: NodeId,
        toolkit: &ToolkitDefinition,
    ) -> Result<(), DomainError> {
        self.item_mut(node).is_materialised = true;
        // A collection container's properties are schema templates for its
        // items; they carry no configuration of their own and stay
        // unmaterialised when the container comes into existence.
        if self.item(node).kind() == SchemaKind::Collection {
            return Ok(());
        }
        for child in self.properties(node).to_vec() {
            match self.item(child).kind() {
                SchemaKind::Attribute => {
                    let schema = self.item(child).schema().require_attribute(toolkit)?;
                    let value = match self.item(child).value() {
                        Some(existing) => Some(existing.clone()),
                        None => schema.default_if_valid(),
                    };
                    let item = self.item_mut(child);
                    item.is_materialised = true;
                    item.set_value(value);
                }
                _ => {
                    let element = self
                        .item(child)
                        .schema()
                        .resolve_element(toolkit)
                        .ok_or_else(|| DomainError::UnknownSchema {
                            schema_id: self.item(child).schema().schema_id.clone(),
                            toolkit: toolkit.name().to_string(),
                        })?;
                    if element.should_auto_create() {
                        self.materialise_cascade(child, toolkit)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Append a new collection item, constructed fresh from the
    /// collection's element schema. Auto-materialises the collection first
    /// if needed. Every call creates a new node; there is no identity reuse.
    pub fn materialise_collection_item(
        &mut self,
        node: NodeId,
        toolkit: &ToolkitDefinition,
    ) -> Result<NodeId, DomainError> {
        if self.item(node).kind() != SchemaKind::Collection {
            return Err(self.structural_misuse("materialise collection item", node));
        }
        if !self.item(node).is_materialised() {
            self.materialise_cascade(node, toolkit)?;
        }
        let element = self
            .item(node)
            .schema()
            .resolve_element(toolkit)
            .ok_or_else(|| DomainError::UnknownSchema {
                schema_id: self.item(node).schema().schema_id.clone(),
                toolkit: toolkit.name().to_string(),
            })?
            .clone();
        let item = self.build_composite(&element, SchemaKind::CollectionItem, true);
        if let ItemState::Collection { items, .. } = &mut self.item_mut(node).state {
            items.push(item);
        }
        // New nodes carry no ancestry yet; run the populator over just the
        // new subtree, seeded with the owning collection.
        visit::accept(self, item, &mut AncestryPopulator::seeded(node));
        Ok(item)
    }

    /// Unmaterialise a node.
    ///
    /// - Collection item: removed from its owning collection's items (by
    ///   identity); fails if it is not present.
    /// - Element: forces the whole subtree unmaterialised, overriding the
    ///   auto-create policy.
    /// - Collection: clears its items and forces its properties
    ///   unmaterialised.
    /// - Pattern root and attributes: structural misuse.
    pub fn unmaterialise(&mut self, node: NodeId) -> Result<(), DomainError> {
        if node == self.root {
            return Err(DomainError::RootImmutable);
        }
        match self.item(node).kind() {
            SchemaKind::Attribute | SchemaKind::Pattern => {
                Err(self.structural_misuse("unmaterialise", node))
            }
            SchemaKind::CollectionItem => {
                let owner = self.immediate_parent(node).ok_or_else(|| {
                    DomainError::AncestryNotPopulated {
                        name: self.item(node).name().to_string(),
                    }
                })?;
                let removed = match &mut self.item_mut(owner).state {
                    ItemState::Collection { items, .. } => {
                        let before = items.len();
                        items.retain(|&i| i != node);
                        items.len() < before
                    }
                    _ => false,
                };
                if !removed {
                    return Err(DomainError::ItemNotFound {
                        id: self.item(node).id().to_string(),
                        owner: self.item(owner).name().to_string(),
                    });
                }
                self.unmaterialise_cascade(node);
                Ok(())
            }
            SchemaKind::Element | SchemaKind::Collection => {
                self.unmaterialise_cascade(node);
                Ok(())
            }
        }
    }

    /// Forced demateralisation of a whole subtree: everything goes
    /// unmaterialised, attribute values are cleared, collections lose their
    /// items.
    fn unmaterialise_cascade(&mut self, node: NodeId) {
        let item = self.item_mut(node);
        item.is_materialised = false;
        if let ItemState::Attribute { value } = &mut item.state {
            *value = None;
            return;
        }
        if let ItemState::Collection { items, .. } = &mut item.state {
            items.clear();
        }
        for child in self.properties(node).to_vec() {
            self.unmaterialise_cascade(child);
        }
    }

    // ── Property assignment ───────────────────────────────────────────────

    /// Assign raw textual values to named attribute properties.
    ///
    /// Each assignment is validated independently; a failure aborts before
    /// applying that key, but earlier keys in the batch stay applied — there
    /// is no cross-batch rollback.
    pub fn set_properties(
        &mut self,
        node: NodeId,
        toolkit: &ToolkitDefinition,
        assignments: &[(String, String)],
    ) -> Result<(), DomainError> {
        if self.item(node).kind() == SchemaKind::Attribute {
            return Err(self.structural_misuse("set properties", node));
        }
        for (name, raw) in assignments {
            let child =
                self.property(node, name)
                    .ok_or_else(|| DomainError::UnknownProperty {
                        owner: self.item(node).name().to_string(),
                        name: name.clone(),
                    })?;
            if self.item(child).kind() != SchemaKind::Attribute {
                return Err(DomainError::InvalidValue {
                    name: name.clone(),
                    value: raw.clone(),
                    reason: format!("'{name}' is not an attribute"),
                });
            }
            let schema = self.item(child).schema().require_attribute(toolkit)?;
            let value = schema.data_type.coerce(raw).ok_or_else(|| {
                DomainError::InvalidValue {
                    name: name.clone(),
                    value: raw.clone(),
                    reason: format!("expected a '{}' value", schema.data_type),
                }
            })?;
            if !schema.is_valid_value(&value) {
                return Err(DomainError::InvalidValue {
                    name: name.clone(),
                    value: raw.clone(),
                    reason: format!("'{raw}' is not one of the allowed choices"),
                });
            }
            let item = self.item_mut(child);
            item.is_materialised = true;
            item.set_value(Some(value));
        }
        Ok(())
    }

    // ── Migration support ─────────────────────────────────────────────────

    /// Remove a named child from a composite node. The detached subtree
    /// stays in the arena but becomes unreachable.
    pub(crate) fn destroy_property(&mut self, node: NodeId, name: &str) -> Option<NodeId> {
        let target = self.property(node, name)?;
        match &mut self.item_mut(node).state {
            ItemState::Composite { properties } | ItemState::Collection { properties, .. } => {
                properties.retain(|&child| child != target);
            }
            ItemState::Attribute { .. } => {}
        }
        Some(target)
    }

    /// Create a new materialised attribute property under a composite node.
    pub(crate) fn create_attribute_property(
        &mut self,
        node: NodeId,
        schema: &AttributeSchema,
        value: Option<AttributeValue>,
    ) -> NodeId {
        let child = self.alloc(DraftItem {
            id: new_instance_id(),
            name: schema.name.clone(),
            schema: DraftItemSchema::new(&schema.id, SchemaKind::Attribute),
            is_materialised: true,
            parent: Some(node),
            artifact_links: Vec::new(),
            state: ItemState::Attribute { value },
        });
        match &mut self.item_mut(node).state {
            ItemState::Composite { properties } | ItemState::Collection { properties, .. } => {
                properties.push(child);
            }
            ItemState::Attribute { .. } => {}
        }
        child
    }

    /// Update a node's denormalized display name to follow a schema rename.
    pub(crate) fn rename_item(&mut self, node: NodeId, name: impl Into<String>) {
        self.item_mut(node).name = name.into();
    }

    /// Create a new unmaterialised element (or collection) placeholder under
    /// a composite node, built from its schema.
    pub(crate) fn create_element_property(
        &mut self,
        node: NodeId,
        schema: &ElementSchema,
    ) -> NodeId {
        let kind = if schema.is_collection() {
            SchemaKind::Collection
        } else {
            SchemaKind::Element
        };
        let child = self.build_composite(schema, kind, false);
        match &mut self.item_mut(node).state {
            ItemState::Composite { properties } | ItemState::Collection { properties, .. } => {
                properties.push(child);
            }
            ItemState::Attribute { .. } => {}
        }
        visit::accept(self, child, &mut AncestryPopulator::seeded(node));
        child
    }

    pub(crate) fn set_attribute_value(&mut self, node: NodeId, value: Option<AttributeValue>) {
        let item = self.item_mut(node);
        item.is_materialised = true;
        item.set_value(value);
    }

    fn structural_misuse(&self, operation: &'static str, node: NodeId) -> DomainError {
        DomainError::StructuralMisuse {
            operation,
            path: self
                .path(node)
                .unwrap_or_else(|_| self.item(node).name().to_string()),
            kind: self.item(node).kind().label(),
        }
    }
}

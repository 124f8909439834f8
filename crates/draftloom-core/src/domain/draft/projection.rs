//! Lazy projection of a draft subtree as a key/value configuration.
//!
//! Rendering surfaces (CLI output, template substitution, path expression
//! resolution) see a draft as nested maps, not as nodes. [`LazyItemMap`] is
//! that view: a cheap cursor over the tree that produces entries on demand
//! and never builds an intermediate document. Unmaterialised children do
//! not appear — a placeholder has no configuration.

use std::borrow::Cow;

use crate::domain::draft::tree::{DraftItemSchema, DraftTree, NodeId, SchemaKind};
use crate::domain::schema::AttributeValue;

/// What synthetic entries a projection includes beyond the configured
/// properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Include a `Schema` entry exposing the node's schema id and kind.
    pub include_schema: bool,
    /// Include a `Parent` entry projecting the logical parent, walking up
    /// to the pattern root.
    pub include_ancestry: bool,
}

/// A single projected value.
#[derive(Debug, Clone)]
pub enum ConfigValue<'a> {
    /// Synthetic textual entry (id, path).
    Text(Cow<'a, str>),
    /// An attribute's configured value.
    Scalar(&'a AttributeValue),
    /// A nested composite (element, collection container, collection item).
    Map(LazyItemMap<'a>),
    /// The items of a collection, in insertion order.
    Items(LazyItemSeq<'a>),
    /// The node's schema reference.
    Schema(&'a DraftItemSchema),
}

impl<'a> ConfigValue<'a> {
    pub fn as_map(&self) -> Option<LazyItemMap<'a>> {
        match self {
            Self::Map(map) => Some(*map),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&'a AttributeValue> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<LazyItemSeq<'a>> {
        match self {
            Self::Items(seq) => Some(*seq),
            _ => None,
        }
    }
}

/// Lazy map view of one draft node.
#[derive(Debug, Clone, Copy)]
pub struct LazyItemMap<'a> {
    tree: &'a DraftTree,
    node: NodeId,
    options: ProjectionOptions,
}

impl<'a> LazyItemMap<'a> {
    pub fn new(tree: &'a DraftTree, node: NodeId) -> Self {
        Self::with_options(tree, node, ProjectionOptions::default())
    }

    pub fn with_options(tree: &'a DraftTree, node: NodeId, options: ProjectionOptions) -> Self {
        Self {
            tree,
            node,
            options,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The entries of this view, produced lazily in a stable order:
    /// synthetic entries first, then materialised properties in schema
    /// declaration order, then `Items` for non-empty collections.
    pub fn entries(&self) -> Box<dyn Iterator<Item = (&'a str, ConfigValue<'a>)> + 'a> {
        let tree = self.tree;
        let node = self.node;
        let options = self.options;
        let item = tree.item(node);

        let mut head: Vec<(&'a str, ConfigValue<'a>)> =
            vec![("Id", ConfigValue::Text(Cow::Borrowed(item.id())))];
        // Path resolution needs populated ancestry; the entry is simply
        // absent when it is not available.
        if let Ok(path) = tree.configure_path(node) {
            head.push(("ConfigurePath", ConfigValue::Text(Cow::Owned(path))));
        }
        if options.include_schema {
            head.push(("Schema", ConfigValue::Schema(item.schema())));
        }
        if options.include_ancestry {
            if let Some(parent) = tree.parent(node) {
                head.push((
                    "Parent",
                    ConfigValue::Map(LazyItemMap::with_options(tree, parent, options)),
                ));
            }
        }

        if item.kind() == SchemaKind::Attribute {
            head.push(("Name", ConfigValue::Text(Cow::Borrowed(item.name()))));
            if let Some(value) = item.value() {
                head.push(("Value", ConfigValue::Scalar(value)));
            }
            return Box::new(head.into_iter());
        }

        let properties = tree
            .properties(node)
            .iter()
            .copied()
            .filter(move |&child| tree.item(child).is_materialised())
            .filter_map(move |child| {
                let item = tree.item(child);
                match item.kind() {
                    SchemaKind::Attribute => item
                        .value()
                        .map(|value| (item.name(), ConfigValue::Scalar(value))),
                    _ => Some((
                        item.name(),
                        ConfigValue::Map(LazyItemMap::with_options(tree, child, options)),
                    )),
                }
            });

        // Collections only expose an `Items` entry when they have items.
        let items = (item.kind() == SchemaKind::Collection && !tree.items(node).is_empty())
            .then(|| {
                (
                    "Items",
                    ConfigValue::Items(LazyItemSeq {
                        tree,
                        node,
                        options,
                    }),
                )
            });

        Box::new(head.into_iter().chain(properties).chain(items))
    }

    /// Look up a single entry by key. Linear in the node's entry count.
    pub fn get(&self, key: &str) -> Option<ConfigValue<'a>> {
        self.entries().find(|(name, _)| *name == key).map(|(_, v)| v)
    }
}

/// Lazy sequence view over a collection's items.
#[derive(Debug, Clone, Copy)]
pub struct LazyItemSeq<'a> {
    tree: &'a DraftTree,
    node: NodeId,
    options: ProjectionOptions,
}

impl<'a> LazyItemSeq<'a> {
    pub fn len(&self) -> usize {
        self.tree.items(self.node).len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.items(self.node).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LazyItemMap<'a>> + 'a {
        let tree = self.tree;
        let options = self.options;
        self.tree
            .items(self.node)
            .iter()
            .map(move |&item| LazyItemMap::with_options(tree, item, options))
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
        let docs = ElementSchema::new("e-docs", "Docs", Cardinality::ZeroOrOne);
        let mut routes = ElementSchema::new("e-routes", "Routes", Cardinality::ZeroOrMany);
        routes
            .attributes
            .push(AttributeSchema::new("a-path", "Path", AttributeDataType::String));
        pattern.elements.push(api);
        pattern.elements.push(docs);
        pattern.elements.push(routes);
        ToolkitDefinition::new("tk1", ToolkitVersion::new(0, 1, 0), pattern)
    }

    fn tree() -> (ToolkitDefinition, DraftTree) {
        let toolkit = toolkit();
        let mut tree = DraftTree::from_toolkit(&toolkit);
        tree.populate_ancestry();
        (toolkit, tree)
    }

    #[test]
    fn projects_materialised_properties_only() {
        let (_, tree) = tree();
        let map = LazyItemMap::new(&tree, tree.root());
        let keys: Vec<_> = map.entries().map(|(k, _)| k).collect();
        // Docs is unmaterialised; Routes is an (unmaterialised) collection.
        assert_eq!(keys, vec!["Id", "ConfigurePath", "Name", "Api"]);
        match map.get("ConfigurePath") {
            Some(ConfigValue::Text(path)) => assert_eq!(path, "{Service}"),
            other => panic!("expected path entry, got {other:?}"),
        }
    }

    #[test]
    fn scalar_and_nested_lookup() {
        let (_, tree) = tree();
        let map = LazyItemMap::new(&tree, tree.root());
        assert_eq!(
            map.get("Name").and_then(|v| v.as_scalar().cloned()),
            Some(AttributeValue::String("unnamed".into()))
        );
        let api = map.get("Api").and_then(|v| v.as_map()).unwrap();
        assert_eq!(
            api.get("Port").and_then(|v| v.as_scalar().cloned()),
            Some(AttributeValue::Integer(8080))
        );
    }

    #[test]
    fn collections_expose_items() {
        let (toolkit, mut tree) = tree();
        let routes = tree.property(tree.root(), "Routes").unwrap();
        tree.materialise_collection_item(routes, &toolkit).unwrap();
        tree.materialise_collection_item(routes, &toolkit).unwrap();

        let map = LazyItemMap::new(&tree, tree.root());
        let routes_map = map.get("Routes").and_then(|v| v.as_map()).unwrap();
        let items = routes_map.get("Items").and_then(|v| v.as_items()).unwrap();
        assert_eq!(items.len(), 2);

        let ids: Vec<_> = items
            .iter()
            .map(|m| m.get("Id").unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn empty_collections_omit_the_items_entry() {
        let (toolkit, mut tree) = tree();
        let routes = tree.property(tree.root(), "Routes").unwrap();
        // Materialise the container, then empty it again.
        let item = tree.materialise_collection_item(routes, &toolkit).unwrap();
        tree.unmaterialise(item).unwrap();

        let map = LazyItemMap::new(&tree, tree.root());
        let routes_map = map.get("Routes").and_then(|v| v.as_map()).unwrap();
        assert!(routes_map.get("Items").is_none());
        // The container's Path slot is an item template, never a value of
        // the container itself.
        assert!(routes_map.get("Path").is_none());
    }

    #[test]
    fn ancestry_option_projects_parent_chain() {
        let (_, tree) = tree();
        let api = tree.property(tree.root(), "Api").unwrap();
        let options = ProjectionOptions {
            include_schema: false,
            include_ancestry: true,
        };
        let map = LazyItemMap::with_options(&tree, api, options);
        let parent = map.get("Parent").and_then(|v| v.as_map()).unwrap();
        assert_eq!(parent.node(), tree.root());
        // The root has no parent entry.
        assert!(parent.get("Parent").is_none());
    }

    #[test]
    fn schema_option_exposes_schema_reference() {
        let (_, tree) = tree();
        let options = ProjectionOptions {
            include_schema: true,
            include_ancestry: false,
        };
        let map = LazyItemMap::with_options(&tree, tree.root(), options);
        match map.get("Schema") {
            Some(ConfigValue::Schema(schema)) => {
                assert_eq!(schema.schema_id, "p1");
                assert_eq!(schema.kind, SchemaKind::Pattern);
            }
            other => panic!("expected schema entry, got {other:?}"),
        }
    }

    #[test]
    fn attribute_node_projects_name_and_value() {
        let (_, tree) = tree();
        let name = tree.property(tree.root(), "Name").unwrap();
        let map = LazyItemMap::new(&tree, name);
        match map.get("Name") {
            Some(ConfigValue::Text(text)) => assert_eq!(text, "Name"),
            other => panic!("expected name entry, got {other:?}"),
        }
        assert_eq!(
            map.get("Value").and_then(|v| v.as_scalar().cloned()),
            Some(AttributeValue::String("unnamed".into()))
        );
    }
}

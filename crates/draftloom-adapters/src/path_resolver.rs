//! Resolution of `{Pattern.Element.Attribute}` expressions to draft nodes.

use draftloom_core::{
    application::ports::DraftPathResolver,
    domain::{DomainError, DraftDefinition, NodeId},
    error::DraftloomResult,
};

/// Resolves dotted configuration-path expressions against a draft tree.
///
/// Segments are matched case-insensitively against property names; inside
/// a collection, a segment that matches no property is tried as an item
/// instance id. The surrounding `{...}` delimiters are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionPathResolver;

impl ExpressionPathResolver {
    pub fn new() -> Self {
        Self
    }
}

impl DraftPathResolver for ExpressionPathResolver {
    fn resolve(&self, draft: &DraftDefinition, expression: &str) -> DraftloomResult<NodeId> {
        let not_found = || DomainError::PathNotFound {
            expression: expression.to_string(),
        };

        let trimmed = expression.trim();
        let inner = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(trimmed);

        let tree = draft.tree();
        let mut segments = inner.split('.').map(str::trim);

        // The first segment must name the pattern root.
        let first = segments.next().filter(|s| !s.is_empty()).ok_or_else(not_found)?;
        let root = draft.root();
        if !first.eq_ignore_ascii_case(tree.item(root).name()) {
            return Err(not_found().into());
        }

        let mut current = root;
        for segment in segments {
            if segment.is_empty() {
                return Err(not_found().into());
            }
            let by_name = tree
                .properties(current)
                .iter()
                .copied()
                .find(|&child| tree.item(child).name().eq_ignore_ascii_case(segment));
            if let Some(child) = by_name {
                current = child;
                continue;
            }
            // Collection items are addressed by instance id, which is
            // case-sensitive.
            let by_id = tree
                .items(current)
                .iter()
                .copied()
                .find(|&item| tree.item(item).id() == segment);
            match by_id {
                Some(item) => current = item,
                None => return Err(not_found().into()),
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_toolkits;
    use draftloom_core::domain::SchemaKind;
    use draftloom_core::error::DraftloomError;

    fn draft() -> DraftDefinition {
        DraftDefinition::new("billing", builtin_toolkits::web_service())
    }

    #[test]
    fn resolves_root_and_nested_paths() {
        let draft = draft();
        let resolver = ExpressionPathResolver::new();

        let root = resolver.resolve(&draft, "{WebService}").unwrap();
        assert_eq!(root, draft.root());

        let port = resolver.resolve(&draft, "{WebService.Api.Port}").unwrap();
        assert_eq!(draft.tree().item(port).name(), "Port");
        assert_eq!(draft.tree().item(port).kind(), SchemaKind::Attribute);
    }

    #[test]
    fn braces_are_optional_and_names_case_insensitive() {
        let draft = draft();
        let resolver = ExpressionPathResolver::new();
        let a = resolver.resolve(&draft, "webservice.api").unwrap();
        let b = resolver.resolve(&draft, "{WebService.Api}").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn resolves_collection_items_by_id() {
        let mut draft = draft();
        let resolver = ExpressionPathResolver::new();
        let routes = resolver.resolve(&draft, "{WebService.Routes}").unwrap();
        let item = draft.add_collection_item(routes).unwrap();
        let item_id = draft.tree().item(item).id().to_string();

        let resolved = resolver
            .resolve(&draft, &format!("{{WebService.Routes.{item_id}}}"))
            .unwrap();
        assert_eq!(resolved, item);

        // And straight through to the item's attributes.
        let path_attr = resolver
            .resolve(&draft, &format!("{{WebService.Routes.{item_id}.Path}}"))
            .unwrap();
        assert_eq!(draft.tree().item(path_attr).name(), "Path");
    }

    #[test]
    fn unknown_segments_are_path_not_found() {
        let draft = draft();
        let resolver = ExpressionPathResolver::new();
        for expression in ["{Nope}", "{WebService.Nope}", "{WebService..Api}", "{}"] {
            assert!(
                matches!(
                    resolver.resolve(&draft, expression),
                    Err(DraftloomError::Domain(DomainError::PathNotFound { .. }))
                ),
                "expected not-found for {expression}"
            );
        }
    }
}

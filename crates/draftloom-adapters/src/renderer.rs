//! Text rendering against a projected draft configuration.

use draftloom_core::{
    application::{ApplicationError, ports::TextRenderer},
    domain::{ConfigValue, LazyItemMap},
    error::DraftloomResult,
};

/// Renders `{{Dotted.Value}}` placeholders by walking the lazy projection
/// of the target item.
///
/// Placeholder segments are matched case-insensitively. A placeholder that
/// does not resolve to a scalar (or a synthetic text entry) is a rendering
/// error; silently emitting an empty string would corrupt generated
/// artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionRenderer;

impl ProjectionRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TextRenderer for ProjectionRenderer {
    fn render(&self, template: &str, scope: &LazyItemMap<'_>) -> DraftloomResult<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| ApplicationError::RenderingFailed {
                reason: format!("unterminated '{{{{' expression in: {template}"),
            })?;
            let token = after[..end].trim();
            let value = lookup(*scope, token).ok_or_else(|| ApplicationError::RenderingFailed {
                reason: format!("'{token}' does not resolve to a value"),
            })?;
            out.push_str(&value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn lookup(scope: LazyItemMap<'_>, token: &str) -> Option<String> {
    let mut current = scope;
    let mut segments = token.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current
            .entries()
            .find(|(key, _)| key.eq_ignore_ascii_case(segment))
            .map(|(_, value)| value)?;
        if segments.peek().is_some() {
            current = value.as_map()?;
        } else {
            return match value {
                ConfigValue::Scalar(scalar) => Some(scalar.to_string()),
                ConfigValue::Text(text) => Some(text.into_owned()),
                _ => None,
            };
        }
    }
    None
}

//! Implementation of the `draftloom show` command.
//!
//! Projects the target item through [`LazyItemMap`] and renders it either
//! as an indented human-readable listing or as JSON.

use draftloom_adapters::ExpressionPathResolver;
use draftloom_core::{
    application::ports::DraftPathResolver,
    domain::{ConfigValue, LazyItemMap, ProjectionOptions},
};

use crate::{
    cli::{OutputFormat, ShowArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ShowArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    let draft = service.get(&args.draft).map_err(CliError::Core)?;

    let target = match &args.on {
        Some(expression) => ExpressionPathResolver::new()
            .resolve(&draft, expression)
            .map_err(CliError::Core)?,
        None => draft.root(),
    };

    let options = ProjectionOptions {
        include_schema: args.schema,
        include_ancestry: args.ancestry,
    };
    let projection = LazyItemMap::with_options(draft.tree(), target, options);

    match output.format() {
        OutputFormat::Json => {
            // JSON goes straight to stdout so it stays parseable in pipes.
            let json = serde_json::to_string_pretty(&to_json(projection)).map_err(|e| {
                CliError::InvalidInput {
                    message: format!("failed to serialize projection: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;
            println!("{json}");
        }
        _ => {
            output.header(&format!("Draft '{}'", draft.name()))?;
            print_map(&output, projection, 1)?;
        }
    }

    Ok(())
}

// ── human rendering ───────────────────────────────────────────────────────────

fn print_map(output: &OutputManager, map: LazyItemMap<'_>, depth: usize) -> CliResult<()> {
    let indent = "  ".repeat(depth);
    for (key, value) in map.entries() {
        match value {
            ConfigValue::Text(text) => output.print(&format!("{indent}{key}: {text}"))?,
            ConfigValue::Scalar(scalar) => output.print(&format!("{indent}{key}: {scalar}"))?,
            ConfigValue::Schema(schema) => {
                output.print(&format!("{indent}{key}: {}", schema.schema_id))?;
            }
            ConfigValue::Map(nested) => {
                output.print(&format!("{indent}{key}:"))?;
                print_map(output, nested, depth + 1)?;
            }
            ConfigValue::Items(items) => {
                output.print(&format!("{indent}{key}: ({})", items.len()))?;
                for item in items.iter() {
                    print_map(output, item, depth + 1)?;
                    output.print("")?;
                }
            }
        }
    }
    Ok(())
}

// ── JSON rendering ────────────────────────────────────────────────────────────

fn to_json(map: LazyItemMap<'_>) -> serde_json::Value {
    use draftloom_core::domain::AttributeValue;
    use serde_json::Value;

    let mut object = serde_json::Map::new();
    for (key, value) in map.entries() {
        let json = match value {
            ConfigValue::Text(text) => Value::String(text.into_owned()),
            ConfigValue::Scalar(scalar) => match scalar {
                AttributeValue::String(s) => Value::String(s.clone()),
                AttributeValue::Integer(i) => Value::from(*i),
                AttributeValue::Float(f) => Value::from(*f),
                AttributeValue::Boolean(b) => Value::Bool(*b),
            },
            ConfigValue::Schema(schema) => Value::String(schema.schema_id.clone()),
            ConfigValue::Map(nested) => to_json(nested),
            ConfigValue::Items(items) => Value::Array(items.iter().map(to_json).collect()),
        };
        object.insert(key.to_string(), json);
    }
    Value::Object(object)
}

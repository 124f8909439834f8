//! Command handlers.
//!
//! Each submodule owns one subcommand: translate CLI arguments into service
//! calls, display results.  No business logic lives here — that is
//! `draftloom-core`'s job; the handlers only wire up adapters and format
//! output.

pub mod add;
pub mod completions;
pub mod delete;
pub mod list;
pub mod new;
pub mod remove;
pub mod run;
pub mod set;
pub mod show;
pub mod toolkits;
pub mod upgrade;
pub mod validate;

use draftloom_adapters::{
    ExpressionPathResolver, FsDraftStore, InMemoryToolkitStore, ProcessAutomationExecutor,
    ProjectionRenderer,
};
use draftloom_core::application::{DraftService, ToolkitService};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Wire up the production adapter set into a [`DraftService`].
pub(crate) fn draft_service(config: &AppConfig) -> CliResult<DraftService> {
    let toolkits = InMemoryToolkitStore::with_builtin().map_err(CliError::Core)?;
    let drafts = FsDraftStore::new(&config.storage.drafts_dir);
    let resolver = ExpressionPathResolver::new();
    let executor = ProcessAutomationExecutor::new(
        Box::new(ProjectionRenderer::new()),
        &config.storage.output_dir,
    );
    Ok(DraftService::new(
        Box::new(toolkits),
        Box::new(drafts),
        Box::new(resolver),
        Box::new(executor),
    ))
}

/// Wire up a [`ToolkitService`] over the installed-toolkit catalogue.
pub(crate) fn toolkit_service() -> CliResult<ToolkitService> {
    let store = InMemoryToolkitStore::with_builtin().map_err(CliError::Core)?;
    Ok(ToolkitService::new(Box::new(store)))
}

/// Split `NAME=VALUE` arguments into pairs, preserving order.
pub(crate) fn parse_assignments(raw: &[String]) -> CliResult<Vec<(String, String)>> {
    raw.iter()
        .map(|assignment| {
            assignment
                .split_once('=')
                .filter(|(name, _)| !name.trim().is_empty())
                .map(|(name, value)| (name.trim().to_string(), value.to_string()))
                .ok_or_else(|| CliError::InvalidAssignment {
                    raw: assignment.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assignments_splits_on_first_equals() {
        let parsed =
            parse_assignments(&["Name=billing".into(), "Motto=a=b".into()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("Name".to_string(), "billing".to_string()),
                ("Motto".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn parse_assignments_rejects_missing_equals_and_empty_name() {
        assert!(parse_assignments(&["Name billing".into()]).is_err());
        assert!(parse_assignments(&["=value".into()]).is_err());
    }

    #[test]
    fn empty_value_is_allowed() {
        let parsed = parse_assignments(&["Name=".into()]).unwrap();
        assert_eq!(parsed, vec![("Name".to_string(), String::new())]);
    }
}

//! Implementation of the `draftloom new` command.

use tracing::{info, instrument};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `draftloom new` command.
///
/// Creates a draft from the latest installed version of the named toolkit
/// and persists it to the draft store.
#[instrument(skip_all, fields(toolkit = %args.toolkit))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if let Some(name) = &args.name {
        validate_draft_name(name)?;
    }

    let service = super::draft_service(&config)?;
    let draft = service
        .create(&args.toolkit, args.name.as_deref())
        .map_err(CliError::Core)?;

    info!(draft = draft.name(), id = draft.id(), "draft created");
    output.success(&format!(
        "Draft '{}' created from toolkit '{}' v{}",
        draft.name(),
        draft.toolkit().name(),
        draft.toolkit().version,
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  draftloom show {}", draft.name()))?;
        output.print(&format!("  draftloom set {} Name=...", draft.name()))?;
    }

    Ok(())
}

fn validate_draft_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidInput {
            message: "draft name cannot be empty".into(),
            source: None,
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidInput {
            message: format!("draft name '{name}' cannot start with '.'"),
            source: None,
        });
    }
    // Draft names become file names in the store.
    if name.contains('/') || name.contains('\\') {
        return Err(CliError::InvalidInput {
            message: format!("draft name '{name}' cannot contain path separators"),
            source: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_names() {
        assert!(validate_draft_name("").is_err());
        assert!(validate_draft_name(".hidden").is_err());
        assert!(validate_draft_name("a/b").is_err());
        assert!(validate_draft_name("billing").is_ok());
    }
}

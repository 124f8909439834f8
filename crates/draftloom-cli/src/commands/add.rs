//! Implementation of the `draftloom add` command.

use draftloom_core::domain::SchemaKind;
use tracing::instrument;

use crate::{
    cli::{AddArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft, path = %args.expression))]
pub fn execute(
    args: AddArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    let (draft, affected) = service
        .add(&args.draft, &args.expression)
        .map_err(CliError::Core)?;

    let item = draft.tree().item(affected);
    match item.kind() {
        SchemaKind::CollectionItem => {
            output.success(&format!(
                "Added item '{}' to {}",
                item.id(),
                args.expression
            ))?;
            output.info(&format!(
                "Configure it with: draftloom set {} <NAME=VALUE> --on '{}'",
                draft.name(),
                draft.tree().configure_path(affected).map_err(|e| CliError::Core(e.into()))?,
            ))?;
        }
        _ => output.success(&format!("Materialised {}", args.expression))?,
    }

    Ok(())
}

//! Implementation of the `draftloom remove` command.

use tracing::instrument;

use crate::{
    cli::{RemoveArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft, path = %args.expression))]
pub fn execute(
    args: RemoveArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    service
        .remove(&args.draft, &args.expression)
        .map_err(CliError::Core)?;

    output.success(&format!("Removed {}", args.expression))?;
    Ok(())
}

//! Implementation of the `draftloom delete` command.

use tracing::instrument;

use crate::{
    cli::{DeleteArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft))]
pub fn execute(
    args: DeleteArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    service.delete(&args.draft).map_err(CliError::Core)?;
    output.success(&format!("Deleted draft '{}'", args.draft))?;
    Ok(())
}

//! Implementation of the `draftloom set` command.

use tracing::instrument;

use crate::{
    cli::{SetArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft))]
pub fn execute(
    args: SetArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let assignments = super::parse_assignments(&args.assignments)?;

    let service = super::draft_service(&config)?;
    let draft = service
        .configure(&args.draft, args.on.as_deref(), &assignments)
        .map_err(CliError::Core)?;

    let target = args.on.as_deref().unwrap_or("the pattern root");
    output.success(&format!(
        "Set {} value(s) on {} in draft '{}'",
        assignments.len(),
        target,
        draft.name(),
    ))?;

    Ok(())
}

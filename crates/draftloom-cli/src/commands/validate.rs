//! Implementation of the `draftloom validate` command.

use tracing::instrument;

use crate::{
    cli::{ValidateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft))]
pub fn execute(
    args: ValidateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    let results = service
        .validate(&args.draft, args.on.as_deref())
        .map_err(CliError::Core)?;

    if results.is_valid() {
        output.success(&format!("Draft '{}' is valid", args.draft))?;
        return Ok(());
    }

    output.violations(results.violations())?;
    Err(CliError::DraftInvalid {
        draft: args.draft,
        violations: results.len(),
    })
}

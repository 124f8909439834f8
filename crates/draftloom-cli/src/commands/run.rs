//! Implementation of the `draftloom run` command.

use draftloom_core::application::CommandRunOutcome;
use tracing::instrument;

use crate::{
    cli::{RunArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft, command = %args.command))]
pub fn execute(
    args: RunArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    let outcome = service
        .run(&args.draft, args.on.as_deref(), &args.command)
        .map_err(CliError::Core)?;

    match outcome {
        CommandRunOutcome::Invalid(results) => {
            output.violations(results.violations())?;
            Err(CliError::DraftInvalid {
                draft: args.draft,
                violations: results.len(),
            })
        }
        CommandRunOutcome::Executed(result) => {
            for line in &result.log {
                output.bullet(line)?;
            }
            output.success(&format!("Command '{}' completed", args.command))?;
            Ok(())
        }
    }
}

//! Implementation of the `draftloom upgrade` command.

use draftloom_core::domain::ChangeKind;
use tracing::instrument;

use crate::{
    cli::{UpgradeArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(draft = %args.draft, force = args.force))]
pub fn execute(
    args: UpgradeArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    let result = service
        .upgrade(&args.draft, args.force)
        .map_err(CliError::Core)?;

    // Print the change log first so refusal reasons are visible too.
    output.change_log(&result.changes)?;

    if !result.succeeded() {
        let reason = result
            .changes
            .iter()
            .find(|c| c.kind == ChangeKind::Abort)
            .map(|c| c.message.clone())
            .unwrap_or_else(|| "upgrade aborted".into());
        return Err(CliError::UpgradeRefused {
            draft: args.draft,
            reason,
        });
    }

    output.success(&format!(
        "Upgraded draft '{}' from toolkit v{} to v{}",
        args.draft, result.from, result.to
    ))?;
    Ok(())
}

//! Implementation of the `draftloom list` command.

use crate::{
    cli::{ListArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    _args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::draft_service(&config)?;
    let names = service.list().map_err(CliError::Core)?;

    match output.format() {
        OutputFormat::Json => {
            // Serialise as a JSON array to stdout (bypasses OutputManager
            // because JSON output must be parseable even in non-TTY pipes).
            let json = serde_json::to_string_pretty(&names).unwrap_or_else(|_| "[]".into());
            println!("{json}");
        }
        _ => {
            if names.is_empty() {
                output.info("No drafts yet. Create one with: draftloom new <toolkit> --name <name>")?;
                return Ok(());
            }
            output.header("Drafts:")?;
            for name in names {
                output.bullet(&name)?;
            }
        }
    }

    Ok(())
}

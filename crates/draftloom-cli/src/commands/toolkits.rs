//! Implementation of the `draftloom toolkits` command.

use crate::{
    cli::{OutputFormat, ToolkitsArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    _args: ToolkitsArgs,
    _global: GlobalArgs,
    _config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = super::toolkit_service()?;
    let toolkits = service.list().map_err(CliError::Core)?;

    match output.format() {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = toolkits
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "name": t.name,
                        "version": t.version,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".into());
            println!("{json}");
        }
        _ => {
            output.header("Installed toolkits:")?;
            for toolkit in toolkits {
                output.print(&format!(
                    "  {} @ {} ({})",
                    toolkit.name, toolkit.version, toolkit.id
                ))?;
            }
        }
    }

    Ok(())
}

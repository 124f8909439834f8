//! Flags shared by every `draftloom` subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so `draftloom new -q`
//! and `draftloom -q new` both parse.

use std::path::PathBuf;

use clap::Args;

/// Global arguments for all commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Stacks: `-v` logs draft operations, `-vv` engine diagnostics,
    /// `-vvv` full traces.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress everything except errors. Useful when scripting around
    /// `draftloom run`.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes.
    ///
    /// Also honours the `NO_COLOR` convention (<https://no-color.org>):
    /// any non-empty value in the environment disables colour.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = no_color_env,
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Path to a draftloom.toml overriding the default config location.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    /// How results (draft projections, toolkit listings) are rendered.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// `NO_COLOR` carries no defined values; presence of anything non-empty
/// means "disable".
fn no_color_env(raw: &str) -> Result<bool, std::convert::Infallible> {
    Ok(!raw.is_empty())
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain when piped.
    #[default]
    Auto,
    /// Human-readable with colors.
    Human,
    /// Plain text without colors.
    Plain,
    /// JSON output.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_accepts_any_non_empty_value() {
        assert_eq!(no_color_env("1"), Ok(true));
        assert_eq!(no_color_env("true"), Ok(true));
        assert_eq!(no_color_env("yes please"), Ok(true));
        assert_eq!(no_color_env(""), Ok(false));
    }
}

//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "draftloom",
    bin_name = "draftloom",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Pattern toolkits, instantiated",
    long_about = "Draftloom instantiates pattern toolkits into configurable \
                  drafts, validates them, and runs their automation to \
                  generate artifacts.",
    after_help = "EXAMPLES:\n\
        \x20 draftloom new WebService --name billing\n\
        \x20 draftloom set billing Name=billing Environment=production\n\
        \x20 draftloom run billing generate\n\
        \x20 draftloom completions bash > /usr/share/bash-completion/completions/draftloom",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new draft from an installed toolkit.
    #[command(
        visible_alias = "n",
        about = "Create a new draft",
        after_help = "EXAMPLES:\n\
            \x20 draftloom new WebService --name billing\n\
            \x20 draftloom new WebService --name checkout"
    )]
    New(NewArgs),

    /// Show a draft's configuration.
    #[command(
        about = "Show a draft's configuration",
        after_help = "EXAMPLES:\n\
            \x20 draftloom show billing\n\
            \x20 draftloom show billing --on '{WebService.Api}'\n\
            \x20 draftloom show billing --output-format json"
    )]
    Show(ShowArgs),

    /// List all drafts.
    #[command(
        visible_alias = "ls",
        about = "List drafts",
        after_help = "EXAMPLES:\n\
            \x20 draftloom list"
    )]
    List(ListArgs),

    /// Assign attribute values on a draft item.
    #[command(
        name = "set",
        visible_alias = "configure",
        about = "Set attribute values",
        after_help = "EXAMPLES:\n\
            \x20 draftloom set billing Name=billing\n\
            \x20 draftloom set billing Port=9090 --on '{WebService.Api}'"
    )]
    Set(SetArgs),

    /// Materialise an item, or append a collection item.
    #[command(
        about = "Materialise an item or add a collection item",
        after_help = "EXAMPLES:\n\
            \x20 draftloom add billing '{WebService.Api}'\n\
            \x20 draftloom add billing '{WebService.Routes}'"
    )]
    Add(AddArgs),

    /// Unmaterialise an item, or remove a collection item.
    #[command(
        visible_alias = "rm",
        about = "Remove an item",
        after_help = "EXAMPLES:\n\
            \x20 draftloom remove billing '{WebService.Api}'\n\
            \x20 draftloom remove billing '{WebService.Routes.a1b2c3d4}'"
    )]
    Remove(RemoveArgs),

    /// Validate a draft against its toolkit's schema.
    #[command(
        about = "Validate a draft",
        after_help = "EXAMPLES:\n\
            \x20 draftloom validate billing\n\
            \x20 draftloom validate billing --on '{WebService.Routes}'"
    )]
    Validate(ValidateArgs),

    /// Migrate a draft to the latest installed toolkit version.
    #[command(
        about = "Upgrade a draft to the latest toolkit version",
        after_help = "EXAMPLES:\n\
            \x20 draftloom upgrade billing\n\
            \x20 draftloom upgrade billing --force   # cross a major version"
    )]
    Upgrade(UpgradeArgs),

    /// Execute a launchable automation command.
    #[command(
        about = "Run an automation command",
        after_help = "EXAMPLES:\n\
            \x20 draftloom run billing generate\n\
            \x20 draftloom run billing generate --on '{WebService}'"
    )]
    Run(RunArgs),

    /// Delete a draft.
    #[command(
        about = "Delete a draft",
        after_help = "EXAMPLES:\n\
            \x20 draftloom delete billing"
    )]
    Delete(DeleteArgs),

    /// List installed toolkits.
    #[command(
        about = "List installed toolkits",
        after_help = "EXAMPLES:\n\
            \x20 draftloom toolkits\n\
            \x20 draftloom toolkits --output-format json"
    )]
    Toolkits(ToolkitsArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 draftloom completions bash > ~/.local/share/bash-completion/completions/draftloom\n\
            \x20 draftloom completions zsh  > ~/.zfunc/_draftloom\n\
            \x20 draftloom completions fish > ~/.config/fish/completions/draftloom.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `draftloom new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Toolkit (pattern) to instantiate.
    #[arg(value_name = "TOOLKIT", help = "Toolkit name")]
    pub toolkit: String,

    /// Name of the draft to create. Generated from the pattern name when
    /// omitted.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        help = "Draft name (generated when omitted)"
    )]
    pub name: Option<String>,
}

// ── show / list ───────────────────────────────────────────────────────────────

/// Arguments for `draftloom show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Draft to display.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Configuration path of the item to display (defaults to the root).
    #[arg(
        long = "on",
        value_name = "PATH",
        help = "Item to display, e.g. '{WebService.Api}'"
    )]
    pub on: Option<String>,

    /// Include schema identifiers in the output.
    #[arg(long = "schema", help = "Include schema references")]
    pub schema: bool,

    /// Include a `Parent` projection on the displayed item.
    #[arg(long = "ancestry", help = "Include the parent chain")]
    pub ancestry: bool,
}

/// Arguments for `draftloom list`.
#[derive(Debug, Args)]
pub struct ListArgs {}

// ── set ───────────────────────────────────────────────────────────────────────

/// Arguments for `draftloom set`.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Draft to configure.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Attribute assignments.
    #[arg(
        value_name = "NAME=VALUE",
        required = true,
        help = "Attribute assignments, e.g. Name=billing"
    )]
    pub assignments: Vec<String>,

    /// Configuration path of the item to configure (defaults to the root).
    #[arg(
        long = "on",
        value_name = "PATH",
        help = "Item to configure, e.g. '{WebService.Api}'"
    )]
    pub on: Option<String>,
}

// ── add / remove ──────────────────────────────────────────────────────────────

/// Arguments for `draftloom add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Draft to modify.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Configuration path of the item to materialise.  Pointing at a
    /// collection appends a new item instead.
    #[arg(value_name = "PATH", help = "Item to add, e.g. '{WebService.Api}'")]
    pub expression: String,
}

/// Arguments for `draftloom remove`.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Draft to modify.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Configuration path of the item to remove.
    #[arg(value_name = "PATH", help = "Item to remove")]
    pub expression: String,
}

// ── validate / upgrade / run ──────────────────────────────────────────────────

/// Arguments for `draftloom validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Draft to validate.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Restrict validation to the subtree at this path.
    #[arg(long = "on", value_name = "PATH", help = "Subtree to validate")]
    pub on: Option<String>,
}

/// Arguments for `draftloom upgrade`.
#[derive(Debug, Args)]
pub struct UpgradeArgs {
    /// Draft to upgrade.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Allow a breaking (major-version) upgrade.
    #[arg(short = 'f', long = "force", help = "Allow a major-version upgrade")]
    pub force: bool,
}

/// Arguments for `draftloom run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Draft to run against.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,

    /// Name of the launchable command to execute.
    #[arg(value_name = "COMMAND", help = "Automation command name")]
    pub command: String,

    /// Configuration path of the item declaring the command (defaults to
    /// the root).
    #[arg(long = "on", value_name = "PATH", help = "Item declaring the command")]
    pub on: Option<String>,
}

// ── delete / toolkits / completions ───────────────────────────────────────────

/// Arguments for `draftloom delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Draft to delete.
    #[arg(value_name = "DRAFT", help = "Draft name")]
    pub draft: String,
}

/// Arguments for `draftloom toolkits`.
#[derive(Debug, Args)]
pub struct ToolkitsArgs {}

/// Arguments for `draftloom completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum, value_name = "SHELL", help = "Target shell")]
    pub shell: Shell,
}

/// Shells we can generate completion scripts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_new_with_name() {
        let cli = Cli::parse_from(["draftloom", "new", "WebService", "--name", "billing"]);
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.toolkit, "WebService");
                assert_eq!(args.name.as_deref(), Some("billing"));
            }
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn new_without_name_parses() {
        let cli = Cli::parse_from(["draftloom", "new", "WebService"]);
        match cli.command {
            Commands::New(args) => assert!(args.name.is_none()),
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn parses_set_with_assignments_and_target() {
        let cli = Cli::parse_from([
            "draftloom",
            "set",
            "billing",
            "Port=9090",
            "Host=localhost",
            "--on",
            "{WebService.Api}",
        ]);
        match cli.command {
            Commands::Set(args) => {
                assert_eq!(args.assignments, vec!["Port=9090", "Host=localhost"]);
                assert_eq!(args.on.as_deref(), Some("{WebService.Api}"));
            }
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn configure_is_an_alias_for_set() {
        let cli = Cli::parse_from(["draftloom", "configure", "billing", "Name=x"]);
        assert!(matches!(cli.command, Commands::Set(_)));
    }

    #[test]
    fn set_requires_at_least_one_assignment() {
        assert!(Cli::try_parse_from(["draftloom", "set", "billing"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["draftloom", "-q", "-v", "list"]).is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["draftloom", "list", "-vv"]);
        assert_eq!(cli.global.verbose, 2);
    }
}

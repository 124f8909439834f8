//! Terminal output for draft operations.
//!
//! Every human-facing line the binary prints goes through [`OutputManager`]:
//! it resolves the output format once (Auto becomes Human on a TTY, Plain in
//! a pipe), applies quiet mode, and renders the recurring draft shapes —
//! validation violations and migration change logs — consistently across
//! subcommands. JSON output bypasses it and goes straight to stdout.

use std::io::{self, IsTerminal};

use console::Term;
use draftloom_core::domain::{ChangeKind, MigrationChange, ValidationViolation};
use owo_colors::OwoColorize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Tone of a status line; maps to a glyph and a colour.
#[derive(Clone, Copy)]
enum Tone {
    Success,
    Error,
    Warning,
    Info,
}

impl Tone {
    fn glyph(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}", // ✓
            Self::Error => "\u{2717}",   // ✗
            Self::Warning => "\u{26a0}", // ⚠
            Self::Info => "\u{2139}",    // ℹ
        }
    }

    fn paint(self, glyph: &str, msg: &str) -> String {
        match self {
            Self::Success => format!("{} {}", glyph.green().bold(), msg.green()),
            Self::Error => format!("{} {}", glyph.red().bold(), msg.red()),
            Self::Warning => format!("{} {}", glyph.yellow().bold(), msg.yellow()),
            Self::Info => format!("{} {}", glyph.blue().bold(), msg.blue()),
        }
    }
}

/// Renders CLI output according to the resolved format and flags.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };
        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    fn status(&self, tone: Tone, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("{} {msg}", tone.glyph())
        } else {
            tone.paint(tone.glyph(), msg)
        };
        self.term.write_line(&line)
    }

    // ── Status lines ──────────────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Indented list entry (draft names, change-log lines).
    pub fn bullet(&self, msg: &str) -> io::Result<()> {
        self.print(&format!("  {msg}"))
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.status(Tone::Success, msg)
    }

    /// *Not* suppressed in quiet mode — errors must always be visible.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Error, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.status(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.status(Tone::Info, msg)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    // ── Draft shapes ──────────────────────────────────────────────────────

    /// Validation violations, one error line per path.
    pub fn violations(&self, violations: &[ValidationViolation]) -> io::Result<()> {
        for violation in violations {
            self.error(&format!("{}: {}", violation.path, violation.message))?;
        }
        Ok(())
    }

    /// An upgrade's change log: non-breaking entries as plain lines,
    /// breaking entries as warnings, abort entries as errors.
    pub fn change_log(&self, changes: &[MigrationChange]) -> io::Result<()> {
        for change in changes {
            match change.kind {
                ChangeKind::NonBreaking => self.bullet(&change.message)?,
                ChangeKind::Breaking => self.warning(&change.message)?,
                ChangeKind::Abort => self.error(&change.message)?,
            }
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: OutputFormat::Plain, // avoid TTY detection in tests
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print_but_not_errors() {
        let out = make_manager(true, true);
        // Term::stdout() in a test environment won't panic without a TTY;
        // we verify both paths return Ok.
        assert!(out.print("hello").is_ok());
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn violations_render_without_panicking() {
        let out = make_manager(false, true);
        let violations = vec![ValidationViolation {
            path: "{Service.Name}".into(),
            message: "requires a value".into(),
        }];
        assert!(out.violations(&violations).is_ok());
    }

    #[test]
    fn change_log_renders_every_kind() {
        let out = make_manager(false, true);
        let changes = vec![
            MigrationChange::non_breaking("attribute added"),
            MigrationChange::breaking("element deleted"),
            MigrationChange::abort("same version"),
        ];
        assert!(out.change_log(&changes).is_ok());
    }

    #[test]
    fn no_color_flag_reported() {
        let colored = make_manager(false, false);
        let no_color = make_manager(false, true);
        assert!(colored.supports_color());
        assert!(!no_color.supports_color());
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, false);
        assert_eq!(out.format(), OutputFormat::Plain);
    }
}

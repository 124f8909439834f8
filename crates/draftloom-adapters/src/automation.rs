//! Automation command execution.

use std::path::{Path, PathBuf};
use std::process::Command;

use draftloom_core::{
    application::{
        ApplicationError,
        ports::{AutomationExecutor, AutomationOutcome, TextRenderer},
    },
    domain::{ArtifactLink, AutomationKind, CommandExecutableContext, DraftDefinition, LazyItemMap},
    error::DraftloomResult,
};
use tracing::info;

/// Production automation executor.
///
/// CLI commands are spawned as child processes with the output root as
/// working directory; code-template commands render the packaged template
/// against the target item's configuration and write the artifact under
/// the output root, recording an artifact link on the item.
pub struct ProcessAutomationExecutor {
    renderer: Box<dyn TextRenderer>,
    output_root: PathBuf,
}

impl ProcessAutomationExecutor {
    pub fn new(renderer: Box<dyn TextRenderer>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_root: output_root.into(),
        }
    }

    fn execute_cli(
        &self,
        draft: &DraftDefinition,
        context: &CommandExecutableContext,
        executable: &str,
        arguments: Option<&str>,
    ) -> DraftloomResult<AutomationOutcome> {
        let failed = |reason: String| ApplicationError::ExecutionFailed {
            name: context.automation.name.clone(),
            reason,
        };

        let scope = LazyItemMap::new(draft.tree(), context.target);
        let rendered = arguments
            .map(|args| self.renderer.render(args, &scope))
            .transpose()?;

        std::fs::create_dir_all(&self.output_root)
            .map_err(|e| failed(format!("cannot create output directory: {e}")))?;
        let mut command = Command::new(executable);
        command.current_dir(&self.output_root);
        if let Some(args) = &rendered {
            command.args(args.split_whitespace());
        }

        let output = command.output().map_err(|e| failed(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{} ({})", output.status, stderr.trim())).into());
        }

        info!(command = %context.automation.name, %executable, "executed CLI command");
        let mut outcome = AutomationOutcome::line(format!(
            "ran '{executable}{}'",
            rendered.map(|a| format!(" {a}")).unwrap_or_default()
        ));
        let stdout = String::from_utf8_lossy(&output.stdout);
        outcome.log.extend(stdout.lines().map(str::to_string));
        Ok(outcome)
    }

    fn execute_code_template(
        &self,
        draft: &mut DraftDefinition,
        context: &CommandExecutableContext,
        template_id: &str,
        target_path: &str,
    ) -> DraftloomResult<AutomationOutcome> {
        let content = draft
            .toolkit()
            .code_template_content(template_id)
            .ok_or_else(|| ApplicationError::RenderingFailed {
                reason: format!(
                    "code template '{template_id}' is not packaged in toolkit '{}'",
                    draft.toolkit().name()
                ),
            })?
            .to_string();

        let (rendered, relative_path) = {
            let scope = LazyItemMap::new(draft.tree(), context.target);
            (
                self.renderer.render(&content, &scope)?,
                self.renderer.render(target_path, &scope)?,
            )
        };

        let path = self.output_root.join(&relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fs_error(parent, e))?;
        }
        std::fs::write(&path, rendered).map_err(|e| fs_error(&path, e))?;

        // One artifact link per command; re-running refreshes it in place.
        let item = draft.tree_mut().item_mut(context.target);
        let existing = item
            .artifact_links()
            .iter()
            .find(|link| link.command_id == context.automation.id)
            .map(|link| link.id.clone());
        match existing {
            Some(link_id) => {
                if let Some(link) = item.artifact_link_mut(&link_id) {
                    link.update_path_and_tag(relative_path.clone(), None);
                }
            }
            None => item.add_artifact_link(ArtifactLink::new(
                context.automation.id.clone(),
                relative_path.clone(),
                None,
            )),
        }

        info!(command = %context.automation.name, path = %path.display(), "generated artifact");
        Ok(AutomationOutcome::line(format!("generated '{relative_path}'")))
    }
}

impl AutomationExecutor for ProcessAutomationExecutor {
    fn execute(
        &self,
        draft: &mut DraftDefinition,
        context: &CommandExecutableContext,
    ) -> DraftloomResult<AutomationOutcome> {
        match context.automation.kind.clone() {
            AutomationKind::CliCommand {
                executable,
                arguments,
            } => self.execute_cli(draft, context, &executable, arguments.as_deref()),
            AutomationKind::CodeTemplateCommand {
                template_id,
                target_path,
            } => self.execute_code_template(draft, context, &template_id, &target_path),
        }
    }
}

fn fs_error(path: &Path, e: std::io::Error) -> draftloom_core::error::DraftloomError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("failed to write artifact: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtin_toolkits, renderer::ProjectionRenderer};
    use draftloom_core::domain::CommandPreparation;

    fn ready_draft() -> DraftDefinition {
        let mut draft = DraftDefinition::new("billing", builtin_toolkits::web_service());
        let root = draft.root();
        draft
            .set_properties(root, &[("Name".into(), "billing".into())])
            .unwrap();
        let routes = draft.tree().property(root, "Routes").unwrap();
        let item = draft.add_collection_item(routes).unwrap();
        draft
            .set_properties(item, &[("Path".into(), "/health".into())])
            .unwrap();
        draft
    }

    fn executor(root: &Path) -> ProcessAutomationExecutor {
        ProcessAutomationExecutor::new(Box::new(ProjectionRenderer::new()), root)
    }

    #[test]
    fn code_template_command_writes_artifact_and_links_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut draft = ready_draft();
        let root = draft.root();
        let context = match draft.prepare_command(root, "generate").unwrap() {
            CommandPreparation::Ready(context) => context,
            other => panic!("draft should be valid: {other:?}"),
        };

        let outcome = executor(dir.path()).execute(&mut draft, &context).unwrap();
        assert_eq!(outcome.log, vec!["generated 'billing/service.toml'"]);

        let manifest = std::fs::read_to_string(dir.path().join("billing/service.toml")).unwrap();
        assert!(manifest.contains("name = \"billing\""));
        assert!(manifest.contains("port = 8080"));

        let links = draft.tree().item(root).artifact_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path, "billing/service.toml");

        // Re-running refreshes the existing link instead of stacking.
        executor(dir.path()).execute(&mut draft, &context).unwrap();
        assert_eq!(draft.tree().item(root).artifact_links().len(), 1);
    }

    #[test]
    fn missing_executable_is_an_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut draft = ready_draft();
        let mut context = match draft.prepare_command(draft.root(), "generate").unwrap() {
            CommandPreparation::Ready(context) => context,
            other => panic!("draft should be valid: {other:?}"),
        };
        context.automation.kind = AutomationKind::CliCommand {
            executable: "definitely-not-a-real-binary".into(),
            arguments: None,
        };

        let result = executor(dir.path()).execute(&mut draft, &context);
        assert!(result.is_err());
    }
}

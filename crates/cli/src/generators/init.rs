use anyhow::Result;
use strz_core::actions::Action;
use strz_core::prompt::{Answers, Choice, Prompter, Question};
use strz_core::validation::{ValidatorChain, string_empty};
use strz_core::workspace::WorkspaceScope;

use super::{GeneratorContext, Plan, escape_quoted};

pub const WORKSPACE_NAME: &str = "workspaceName";
pub const WORKSPACE_DESCRIPTION: &str = "workspaceDescription";
pub const WORKSPACE_SCOPE: &str = "workspaceScope";
pub const WORKSPACE_AUTHOR: &str = "workspaceAuthor";
pub const WORKSPACE_FOLDER: &str = "workspaceFolder";
pub const WORKSPACE_TITLE: &str = "workspaceTitle";
pub const WORKSPACE_SUMMARY: &str = "workspaceSummary";

/// New workspace under `<cwd>/<workspaceFolder>`, from every `workspace/`
/// template. Skipped entirely when a workspace is already there.
pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let settings = &ctx.settings;
    let default_name = settings
        .cwd
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let scopes = [WorkspaceScope::Landscape, WorkspaceScope::SoftwareSystem]
        .iter()
        .map(|scope| Choice::new(scope.to_string(), scope.dsl_keyword()))
        .collect();

    let mut data = Answers::new().with(WORKSPACE_FOLDER, settings.workspace_folder.clone());
    data.extend(prompter.ask(
        &[
            Question::input(WORKSPACE_NAME, "Workspace name:")
                .with_default(default_name)
                .with_validator(ValidatorChain::new().with(string_empty)),
            Question::input(WORKSPACE_DESCRIPTION, "Workspace description:").with_default(""),
            Question::select(WORKSPACE_SCOPE, "Workspace scope:", scopes)
                .with_default(WorkspaceScope::Landscape.dsl_keyword()),
            Question::input(WORKSPACE_AUTHOR, "Maintained by:")
                .with_default(settings.author.display().unwrap_or_default()),
        ],
        &data,
    )?);

    // README gets the answers as typed
    for (raw, copy) in [(WORKSPACE_NAME, WORKSPACE_TITLE), (WORKSPACE_DESCRIPTION, WORKSPACE_SUMMARY)] {
        let value = data.text(raw);
        data.insert(copy, value);
    }
    escape_quoted(&mut data, &[WORKSPACE_NAME, WORKSPACE_DESCRIPTION]);

    let existing = ctx.workspace_dir.clone();
    let action = Action::create_many("{{workspaceFolder}}", "workspace/", "workspace/**/*")
        .skip_if_exists()
        .skip(move |_: &Answers| {
            Ok(existing
                .as_ref()
                .map(|dir| format!("workspace already exists at {}", dir.display())))
        });

    Ok(Plan::new(&settings.cwd, data, vec![action]))
}

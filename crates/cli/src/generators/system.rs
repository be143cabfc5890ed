use anyhow::Result;
use strz_core::actions::Action;
use strz_core::naming::{to_kebab_case, to_pascal_case};
use strz_core::prompt::{Answers, Prompter, Question};
use strz_core::relationships::{CollectOptions, RelationshipType, collect_relationships};
use strz_core::validation::{SYSTEM_NAME, ValidatorChain, string_empty, validate_duplicated_elements};
use strz_core::workspace::{ElementKind, EnumerateOptions, WORKSPACE_FILE, WorkspaceScope};
use tracing::warn;

use super::{
    GeneratorContext, MODEL_INDENT, Plan, escape_quoted, include_action, markers, named,
    relationship_actions,
};

pub const SYSTEM_DESCRIPTION: &str = "systemDescription";
pub const SYSTEM_CREATE_VIEW: &str = "systemCreateView";

/// Internal or external software system. External systems get their own
/// folder, the `External` tag and no view.
pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter, external: bool) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;
    let snapshot = ctx.snapshot();

    if !external {
        warn_single_system_scope(ctx);
    }

    let mut questions = vec![
        Question::input(SYSTEM_NAME, "Software system name:").with_validator(
            ValidatorChain::new()
                .with(string_empty)
                .with(validate_duplicated_elements(snapshot)),
        ),
        Question::input(SYSTEM_DESCRIPTION, "Software system description:").with_default(""),
    ];
    if !external {
        questions.push(Question::confirm(
            SYSTEM_CREATE_VIEW,
            "Create a system context view?",
            true,
        ));
    }

    let mut data = Answers::new();
    data.extend(prompter.ask(&questions, &data)?);

    let name = data.text(SYSTEM_NAME);
    let id = to_pascal_case(&name);
    let file = to_kebab_case(&name);
    data.insert("systemId", id.clone());
    data.insert("systemFile", file.clone());

    let options = CollectOptions::new(ctx.relationship_defaults(RelationshipType::Outgoing));
    let relationships = collect_relationships(prompter, &name, snapshot, &options, &data)?;

    let mut actions = Vec::new();
    if external {
        let path = format!("model/external-systems/{file}.dsl");
        actions.push(
            Action::create(&path, named("external-system/external-system.dsl")).skip_if_exists(),
        );
        actions.push(include_action(WORKSPACE_FILE, markers::SYSTEMS, &path, MODEL_INDENT)?);
    } else {
        let path = format!("model/systems/{file}.dsl");
        actions.push(Action::create(&path, named("system/system.dsl")).skip_if_exists());
        actions.push(include_action(WORKSPACE_FILE, markers::SYSTEMS, &path, MODEL_INDENT)?);

        data.insert("viewKey", format!("{id}-Context"));
        data.insert("viewDescription", format!("System context of {name}"));
        data.insert("viewScopeId", id.clone());
        let view = format!("views/{file}-context.dsl");
        actions.push(
            Action::create(&view, named("view/system-context.dsl"))
                .skip_if_exists()
                .when(|answers: &Answers| Ok(answers.flag(SYSTEM_CREATE_VIEW))),
        );
        actions.push(
            include_action(WORKSPACE_FILE, markers::VIEWS, &view, MODEL_INDENT)?
                .when(|answers: &Answers| Ok(answers.flag(SYSTEM_CREATE_VIEW))),
        );
    }
    actions.extend(relationship_actions(workspace_dir, &id, &file, &relationships, "->")?);

    escape_quoted(&mut data, &[SYSTEM_NAME, SYSTEM_DESCRIPTION, "viewDescription"]);
    Ok(Plan::new(workspace_dir, data, actions))
}

/// A `softwaresystem` scoped workspace describes one internal system.
fn warn_single_system_scope(ctx: &GeneratorContext) {
    let Some(snapshot) = ctx.snapshot() else {
        return;
    };
    if snapshot.scope() != Some(WorkspaceScope::SoftwareSystem) {
        return;
    }

    let existing: Vec<String> = ctx
        .elements(EnumerateOptions::top_level())
        .into_iter()
        .filter(|element| element.kind == ElementKind::SoftwareSystem)
        .map(|element| element.name)
        .collect();
    if !existing.is_empty() {
        warn!("Workspace scope is softwaresystem but it already has {:?}", existing);
        println!(
            "⚠️  This workspace is scoped to a single software system and already contains {}",
            existing.join(", ")
        );
    }
}

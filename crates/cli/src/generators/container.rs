use anyhow::{Result, bail};
use strz_core::actions::Action;
use strz_core::naming::{same_identifier, to_kebab_case, to_pascal_case};
use strz_core::prompt::{Answers, Choice, Prompter, Question};
use strz_core::relationships::{CollectOptions, RelationshipType, collect_relationships};
use strz_core::validation::{
    CONTAINER_NAME, SYSTEM_NAME, ValidatorChain, duplicated_system_name, string_empty,
    validate_duplicated_elements,
};
use strz_core::workspace::{
    BaseElement, ModelElement, WORKSPACE_FILE, WorkspaceElement,
    resolve_available_archetype_elements,
};

use super::{
    ELEMENT_INDENT, GeneratorContext, MODEL_INDENT, Plan, escape_quoted, include_action, markers,
    name_choices, named, relationship_actions, relationship_file,
};

pub const CONTAINER_DESCRIPTION: &str = "containerDescription";
pub const CONTAINER_TECHNOLOGY: &str = "containerTechnology";
pub const CONTAINER_ARCHETYPE: &str = "containerArchetype";
pub const CONTAINER_CREATE_VIEW: &str = "containerCreateView";

pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;
    let snapshot = ctx.snapshot();

    let systems = ctx.internal_systems();
    if systems.is_empty() {
        bail!("No software system to add a container to; run `strz system` first");
    }
    let archetypes = archetype_question(
        CONTAINER_ARCHETYPE,
        "container",
        resolve_available_archetype_elements(workspace_dir, BaseElement::Container),
    );

    let mut questions = vec![
        Question::select(SYSTEM_NAME, "Software system:", name_choices(&systems)),
        Question::input(CONTAINER_NAME, "Container name:").with_validator(
            ValidatorChain::new()
                .with(string_empty)
                .with(duplicated_system_name)
                .with(validate_duplicated_elements(snapshot)),
        ),
        Question::input(CONTAINER_DESCRIPTION, "Container description:").with_default(""),
        Question::input(CONTAINER_TECHNOLOGY, "Container technology:").with_default(""),
    ];
    questions.extend(archetypes);
    questions.push(Question::confirm(
        CONTAINER_CREATE_VIEW,
        "Create the system's container view if missing?",
        true,
    ));

    let mut data = Answers::new().with(CONTAINER_ARCHETYPE, "container");
    data.extend(prompter.ask(&questions, &data)?);

    let system = data.text(SYSTEM_NAME);
    let name = data.text(CONTAINER_NAME);
    let system_id = to_pascal_case(&system);
    let system_file = to_kebab_case(&system);
    let id = to_pascal_case(&name);
    let file = to_kebab_case(&name);
    data.insert("systemId", system_id.clone());
    data.insert("systemFile", system_file.clone());
    data.insert("containerId", id.clone());
    data.insert("containerFile", file.clone());
    data.insert("viewKey", format!("{system_id}-Containers"));
    data.insert("viewDescription", format!("Containers of {system}"));
    data.insert("viewScopeId", system_id);

    let options = CollectOptions::new(ctx.relationship_defaults(RelationshipType::Incoming))
        .with_filter(|element: &ModelElement| !same_identifier(&element.name, &system));
    let relationships = collect_relationships(prompter, &name, snapshot, &options, &data)?;

    let path = format!("model/systems/{system_file}/{file}.dsl");
    let system_path = format!("model/systems/{system_file}.dsl");
    let view = format!("views/{system_file}-containers.dsl");
    let mut actions = vec![
        Action::create(&path, named("container/container.dsl")).skip_if_exists(),
        include_action(
            &system_path,
            markers::CONTAINERS,
            &format!("{system_file}/{file}.dsl"),
            ELEMENT_INDENT,
        )?,
        Action::create(&view, named("view/container.dsl"))
            .skip_if_exists()
            .when(|answers: &Answers| Ok(answers.flag(CONTAINER_CREATE_VIEW))),
        include_action(WORKSPACE_FILE, markers::VIEWS, &view, MODEL_INDENT)?
            .when(|answers: &Answers| Ok(answers.flag(CONTAINER_CREATE_VIEW))),
    ];
    actions.extend(relationship_actions(
        workspace_dir,
        &id,
        &relationship_file(Some(&system), None, &name),
        &relationships,
        "->",
    )?);

    escape_quoted(
        &mut data,
        &[CONTAINER_NAME, CONTAINER_DESCRIPTION, CONTAINER_TECHNOLOGY, "viewDescription"],
    );
    Ok(Plan::new(workspace_dir, data, actions))
}

/// Optional archetype pick; `keyword` is the plain DSL element keyword used
/// when no archetype applies. Nothing is asked when no archetype exists.
pub(crate) fn archetype_question<'a>(
    name: &str,
    keyword: &str,
    archetypes: Vec<WorkspaceElement>,
) -> Option<Question<'a>> {
    if archetypes.is_empty() {
        return None;
    }

    let mut choices = vec![Choice::new(format!("{keyword} (no archetype)"), keyword)];
    choices.extend(
        archetypes
            .into_iter()
            .map(|archetype| Choice::new(archetype.name.clone(), archetype.name)),
    );
    Some(Question::select(name, "Archetype:", choices).with_default(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{SNAPSHOT, descriptions, workspace};
    use std::fs;
    use strz_core::prompt::ScriptedPrompter;
    use strz_core::relationships::TARGETS_QUESTION;

    #[test]
    fn test_container_plan() {
        let (_temp_dir, ctx) = workspace(Some(SNAPSHOT));
        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(SYSTEM_NAME, "Internet Banking")
                .with(CONTAINER_NAME, "Web App")
                .with(CONTAINER_TECHNOLOGY, "React"),
            Answers::new(),
        ]);

        let plan = plan(&ctx, &mut prompter).unwrap();
        assert_eq!(plan.data.get("containerId"), Some("WebApp"));
        assert_eq!(plan.data.get(CONTAINER_ARCHETYPE), Some("container"));
        assert_eq!(plan.data.get("viewKey"), Some("InternetBanking-Containers"));
        assert_eq!(
            descriptions(&plan),
            vec![
                "create model/systems/internet-banking/web-app.dsl",
                "append to model/systems/internet-banking.dsl",
                "create views/internet-banking-containers.dsl",
                "append to workspace.dsl",
            ]
        );
    }

    #[test]
    fn test_own_system_is_not_a_relationship_target() {
        let (_temp_dir, ctx) = workspace(Some(SNAPSHOT));
        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(SYSTEM_NAME, "Internet Banking")
                .with(CONTAINER_NAME, "Worker"),
            Answers::new().with(TARGETS_QUESTION, vec!["InternetBanking".to_string()]),
        ]);

        // the own system is not among the choices, so picking it fails
        assert!(plan(&ctx, &mut prompter).is_err());
    }

    #[test]
    fn test_container_named_like_its_system_is_rejected() {
        let (_temp_dir, ctx) = workspace(None);
        let systems = ctx.workspace_dir.as_ref().unwrap().join("model/systems");
        fs::create_dir_all(&systems).unwrap();
        fs::write(systems.join("payments.dsl"), "x").unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(SYSTEM_NAME, "payments")
                .with(CONTAINER_NAME, "Payments"),
        ]);
        let err = plan(&ctx, &mut prompter).unwrap_err();
        assert!(err.to_string().contains("parent software system"));
    }

    #[test]
    fn test_archetype_is_offered_when_present() {
        let (_temp_dir, ctx) = workspace(None);
        let dir = ctx.workspace_dir.as_ref().unwrap();
        fs::create_dir_all(dir.join("model/systems")).unwrap();
        fs::write(dir.join("model/systems/payments.dsl"), "x").unwrap();
        fs::create_dir_all(dir.join("archetypes")).unwrap();
        fs::write(dir.join("archetypes/1_microservice_container.dsl"), "x").unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(SYSTEM_NAME, "payments")
                .with(CONTAINER_NAME, "Ledger")
                .with(CONTAINER_ARCHETYPE, "microservice"),
        ]);
        let plan = plan(&ctx, &mut prompter).unwrap();
        assert_eq!(plan.data.get(CONTAINER_ARCHETYPE), Some("microservice"));
    }

    #[test]
    fn test_no_system_fails_before_prompting() {
        let (_temp_dir, ctx) = workspace(None);
        let mut prompter = ScriptedPrompter::new(vec![]);

        assert!(plan(&ctx, &mut prompter).is_err());
        assert_eq!(prompter.calls(), 0);
    }
}

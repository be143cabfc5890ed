use anyhow::{Result, bail};
use strz_core::actions::Action;
use strz_core::naming::{component_identifier, same_identifier, to_kebab_case, to_pascal_case};
use strz_core::prompt::{Answers, Prompter, Question};
use strz_core::relationships::{CollectOptions, RelationshipType, collect_relationships};
use strz_core::validation::{
    CONTAINER_NAME, SYSTEM_NAME, ValidatorChain, duplicated_container_name,
    duplicated_system_name, string_empty, validate_duplicated_component_name,
};
use strz_core::workspace::{BaseElement, ModelElement, resolve_available_archetype_elements};

use super::container::archetype_question;
use super::{
    ELEMENT_INDENT, GeneratorContext, Plan, escape_quoted, include_action, markers, name_choices,
    named, relationship_actions, relationship_file,
};

pub const COMPONENT_NAME: &str = "componentName";
pub const COMPONENT_DESCRIPTION: &str = "componentDescription";
pub const COMPONENT_TECHNOLOGY: &str = "componentTechnology";
pub const COMPONENT_ARCHETYPE: &str = "componentArchetype";

pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;
    let snapshot = ctx.snapshot();

    let systems = ctx.internal_systems();
    if systems.is_empty() {
        bail!("No software system to add a component to; run `strz system` first");
    }

    let mut data = Answers::new().with(COMPONENT_ARCHETYPE, "component");
    data.extend(prompter.ask(
        &[Question::select(SYSTEM_NAME, "Software system:", name_choices(&systems))],
        &data,
    )?);
    let system = data.text(SYSTEM_NAME);

    // The container list depends on the chosen system
    let containers = ctx.system_containers(&system);
    if containers.is_empty() {
        bail!("Software system '{system}' has no container; run `strz container` first");
    }

    let mut questions = vec![
        Question::select(CONTAINER_NAME, "Container:", name_choices(&containers)),
        Question::input(COMPONENT_NAME, "Component name:").with_validator(
            ValidatorChain::new()
                .with(string_empty)
                .with(duplicated_system_name)
                .with(duplicated_container_name)
                .with(validate_duplicated_component_name(snapshot)),
        ),
        Question::input(COMPONENT_DESCRIPTION, "Component description:").with_default(""),
        Question::input(COMPONENT_TECHNOLOGY, "Component technology:").with_default(""),
    ];
    questions.extend(archetype_question(
        COMPONENT_ARCHETYPE,
        "component",
        resolve_available_archetype_elements(workspace_dir, BaseElement::Component),
    ));
    data.extend(prompter.ask(&questions, &data)?);

    let container = data.text(CONTAINER_NAME);
    let name = data.text(COMPONENT_NAME);
    let id = component_identifier(&container, &name);
    let system_file = to_kebab_case(&system);
    let container_file = to_kebab_case(&container);
    let file = to_kebab_case(&name);
    data.insert("systemId", to_pascal_case(&system));
    data.insert("containerId", to_pascal_case(&container));
    data.insert("componentId", id.clone());
    data.insert("componentFile", file.clone());

    let options = CollectOptions::new(ctx.relationship_defaults(RelationshipType::Incoming))
        .with_filter(|element: &ModelElement| {
            !same_identifier(&element.name, &system) && !same_identifier(&element.name, &container)
        });
    let relationships = collect_relationships(prompter, &name, snapshot, &options, &data)?;

    let container_dir = format!("model/systems/{system_file}/{container_file}");
    let path = format!("{container_dir}/{file}.dsl");
    let mut actions = vec![
        Action::create(&path, named("component/component.dsl")).skip_if_exists(),
        include_action(
            &format!("{container_dir}.dsl"),
            markers::COMPONENTS,
            &format!("{container_file}/{file}.dsl"),
            ELEMENT_INDENT,
        )?,
    ];
    actions.extend(relationship_actions(
        workspace_dir,
        &id,
        &relationship_file(Some(&system), Some(&container), &name),
        &relationships,
        "->",
    )?);

    escape_quoted(&mut data, &[COMPONENT_NAME, COMPONENT_DESCRIPTION, COMPONENT_TECHNOLOGY]);
    Ok(Plan::new(workspace_dir, data, actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{SNAPSHOT, descriptions, workspace};
    use strz_core::prompt::ScriptedPrompter;

    #[test]
    fn test_component_plan() {
        let (_temp_dir, ctx) = workspace(Some(SNAPSHOT));
        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new().with(SYSTEM_NAME, "Internet Banking"),
            Answers::new()
                .with(CONTAINER_NAME, "Api")
                .with(COMPONENT_NAME, "Sign Up"),
            Answers::new(),
        ]);

        let plan = plan(&ctx, &mut prompter).unwrap();
        assert_eq!(plan.data.get("componentId"), Some("Api_SignUp"));
        assert_eq!(plan.data.get(COMPONENT_ARCHETYPE), Some("component"));
        assert_eq!(
            descriptions(&plan),
            vec![
                "create model/systems/internet-banking/api/sign-up.dsl",
                "append to model/systems/internet-banking/api.dsl",
            ]
        );
    }

    #[test]
    fn test_component_name_is_scoped_to_container() {
        let (_temp_dir, ctx) = workspace(Some(SNAPSHOT));
        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new().with(SYSTEM_NAME, "Internet Banking"),
            Answers::new()
                .with(CONTAINER_NAME, "Api")
                .with(COMPONENT_NAME, "login"),
        ]);

        let err = plan(&ctx, &mut prompter).unwrap_err();
        assert!(err.to_string().contains("already exists in container 'Api'"));
    }

    #[test]
    fn test_component_named_like_its_container_is_rejected() {
        let (_temp_dir, ctx) = workspace(Some(SNAPSHOT));
        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new().with(SYSTEM_NAME, "Internet Banking"),
            Answers::new()
                .with(CONTAINER_NAME, "Api")
                .with(COMPONENT_NAME, "API"),
        ]);

        assert!(plan(&ctx, &mut prompter).is_err());
    }
}

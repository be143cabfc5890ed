use anyhow::Result;
use strz_core::actions::Action;
use strz_core::naming::{to_kebab_case, to_pascal_case};
use strz_core::prompt::{Answers, Prompter, Question};
use strz_core::relationships::{CollectOptions, RelationshipType, collect_relationships};
use strz_core::validation::{ValidatorChain, string_empty, validate_duplicated_elements};
use strz_core::workspace::WORKSPACE_FILE;

use super::{
    GeneratorContext, MODEL_INDENT, Plan, escape_quoted, include_action, markers, named,
    relationship_actions,
};

pub const PERSON_NAME: &str = "personName";
pub const PERSON_DESCRIPTION: &str = "personDescription";

pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;
    let snapshot = ctx.snapshot();

    let mut data = Answers::new();
    data.extend(prompter.ask(
        &[
            Question::input(PERSON_NAME, "Person name:").with_validator(
                ValidatorChain::new()
                    .with(string_empty)
                    .with(validate_duplicated_elements(snapshot)),
            ),
            Question::input(PERSON_DESCRIPTION, "Person description:").with_default("A user"),
        ],
        &data,
    )?);

    let name = data.text(PERSON_NAME);
    let id = to_pascal_case(&name);
    let file = to_kebab_case(&name);
    data.insert("personId", id.clone());
    data.insert("personFile", file.clone());

    let options = CollectOptions::new(ctx.relationship_defaults(RelationshipType::Outgoing));
    let relationships = collect_relationships(prompter, &name, snapshot, &options, &data)?;

    let path = format!("model/people/{file}.dsl");
    let mut actions = vec![
        Action::create(&path, named("person/person.dsl")).skip_if_exists(),
        include_action(WORKSPACE_FILE, markers::PEOPLE, &path, MODEL_INDENT)?,
    ];
    actions.extend(relationship_actions(workspace_dir, &id, &file, &relationships, "->")?);

    escape_quoted(&mut data, &[PERSON_NAME, PERSON_DESCRIPTION]);
    Ok(Plan::new(workspace_dir, data, actions))
}

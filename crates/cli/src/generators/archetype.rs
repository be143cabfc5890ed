use anyhow::Result;
use strz_core::actions::Action;
use strz_core::naming::to_kebab_case;
use strz_core::prompt::{Answers, Choice, Prompter, Question};
use strz_core::templates::escape_quotes;
use strz_core::validation::{ValidatorChain, string_empty, validate_duplicated_archetype};
use strz_core::workspace::archetypes::{ARCHETYPES_FOLDER, archetype_file_name};
use strz_core::workspace::{BaseElement, WORKSPACE_FILE, list_archetypes, next_archetype_position};

use super::{ARCHETYPE_INDENT, GeneratorContext, Plan, include_action, markers, named};

pub const ARCHETYPE_KIND: &str = "archetypeKind";
pub const ARCHETYPE_LABEL: &str = "archetypeLabel";
pub const ARCHETYPE_TECHNOLOGY: &str = "archetypeTechnology";
pub const ARCHETYPE_TAGS: &str = "archetypeTags";

pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;
    let existing = list_archetypes(workspace_dir);

    let mut data = Answers::new();
    data.extend(prompter.ask(
        &[
            Question::select(
                ARCHETYPE_KIND,
                "Based on:",
                BaseElement::ALL
                    .iter()
                    .map(|kind| Choice::new(kind.as_str(), kind.as_str()))
                    .collect(),
            ),
            Question::input(ARCHETYPE_LABEL, "Archetype label:").with_validator(
                ValidatorChain::new()
                    .with(string_empty)
                    .with(validate_duplicated_archetype(&existing)),
            ),
            Question::input(ARCHETYPE_TECHNOLOGY, "Technology:").with_default(""),
            Question::input(ARCHETYPE_TAGS, "Tags (comma separated):").with_default(""),
        ],
        &data,
    )?);

    let kind: BaseElement = data.text(ARCHETYPE_KIND).parse().map_err(anyhow::Error::msg)?;
    let label = to_kebab_case(&data.text(ARCHETYPE_LABEL));
    data.insert(ARCHETYPE_LABEL, label.clone());
    data.insert(
        "archetypeProperties",
        archetype_properties(
            kind,
            &data.text(ARCHETYPE_TECHNOLOGY),
            &data.text(ARCHETYPE_TAGS),
        ),
    );

    let position = next_archetype_position(workspace_dir);
    let path = format!(
        "{ARCHETYPES_FOLDER}/{}",
        archetype_file_name(position, &label, kind)
    );
    let template = match kind {
        BaseElement::Relationship => "archetype/relationship.dsl",
        _ => "archetype/element.dsl",
    };
    let actions = vec![
        Action::create(&path, named(template)).skip_if_exists(),
        include_action(WORKSPACE_FILE, markers::ARCHETYPES, &path, ARCHETYPE_INDENT)?,
    ];

    Ok(Plan::new(workspace_dir, data, actions))
}

/// Body lines of an archetype block. Software systems carry no technology.
fn archetype_properties(kind: BaseElement, technology: &str, tags: &str) -> String {
    let mut lines = Vec::new();
    if !technology.is_empty() && kind != BaseElement::SoftwareSystem {
        lines.push(format!("    technology \"{}\"", escape_quotes(technology)));
    }
    if !tags.is_empty() {
        lines.push(format!("    tags \"{}\"", escape_quotes(tags)));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::{descriptions, workspace};
    use std::fs;
    use strz_core::prompt::ScriptedPrompter;

    #[test]
    fn test_first_archetype_gets_position_one() {
        let (_temp_dir, ctx) = workspace(None);
        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(ARCHETYPE_KIND, "container")
                .with(ARCHETYPE_LABEL, "Micro Service")
                .with(ARCHETYPE_TECHNOLOGY, "Rust"),
        ]);

        let plan = plan(&ctx, &mut prompter).unwrap();
        assert_eq!(plan.data.get(ARCHETYPE_LABEL), Some("micro-service"));
        assert_eq!(
            descriptions(&plan),
            vec!["create archetypes/1_micro-service_container.dsl", "append to workspace.dsl"]
        );
    }

    #[test]
    fn test_positions_continue_across_kinds() {
        let (_temp_dir, ctx) = workspace(None);
        let dir = ctx.workspace_dir.as_ref().unwrap().join(ARCHETYPES_FOLDER);
        fs::create_dir_all(&dir).unwrap();
        for file in ["1_web_container.dsl", "2_https_relationship.dsl", "3_job_component.dsl"] {
            fs::write(dir.join(file), "x").unwrap();
        }

        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(ARCHETYPE_KIND, "relationship")
                .with(ARCHETYPE_LABEL, "grpc"),
        ]);
        let plan = plan(&ctx, &mut prompter).unwrap();
        assert_eq!(descriptions(&plan)[0], "create archetypes/4_grpc_relationship.dsl");
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        let (_temp_dir, ctx) = workspace(None);
        let dir = ctx.workspace_dir.as_ref().unwrap().join(ARCHETYPES_FOLDER);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("1_https_relationship.dsl"), "x").unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answers::new()
                .with(ARCHETYPE_KIND, "container")
                .with(ARCHETYPE_LABEL, "HTTPS"),
        ]);
        assert!(plan(&ctx, &mut prompter).is_err());
    }

    #[test]
    fn test_properties() {
        assert_eq!(
            archetype_properties(BaseElement::Container, "Rust", "Service"),
            "    technology \"Rust\"\n    tags \"Service\""
        );
        assert_eq!(archetype_properties(BaseElement::SoftwareSystem, "Rust", ""), "");
        assert_eq!(
            archetype_properties(BaseElement::Component, r#"Rust "2024""#, ""),
            "    technology \"Rust \\\"2024\\\"\""
        );
    }
}

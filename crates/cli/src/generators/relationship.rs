use anyhow::{Context, Result, bail};
use strz_core::prompt::{Answers, Choice, Prompter, Question};
use strz_core::relationships::{CollectOptions, RelationshipType, collect_relationships};
use strz_core::workspace::{BaseElement, EnumerateOptions, archetype_choices};
use tracing::info;

use super::{GeneratorContext, Plan, element_relationship_file, relationship_actions};

pub const RELATIONSHIP_SOURCE: &str = "relationshipSource";
pub const RELATIONSHIP_ARCHETYPE: &str = "relationshipArchetype";

const PLAIN_ARROW: &str = "->";

pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;
    let elements = ctx.elements(EnumerateOptions::top_level().with_containers().with_components());
    if elements.is_empty() {
        bail!("No elements to relate; export the workspace to workspace.json first");
    }

    let mut questions = vec![Question::select(
        RELATIONSHIP_SOURCE,
        "Source element:",
        elements
            .iter()
            .map(|element| Choice::new(element.label(), element.identifier()))
            .collect(),
    )];
    let arrows = archetype_choices(workspace_dir, &[BaseElement::Relationship]);
    if !arrows.is_empty() {
        let mut choices = vec![Choice::new(PLAIN_ARROW, PLAIN_ARROW)];
        choices.extend(arrows);
        questions.push(
            Question::select(RELATIONSHIP_ARCHETYPE, "Relationship archetype:", choices)
                .with_default(PLAIN_ARROW),
        );
    }

    let mut data = Answers::new().with(RELATIONSHIP_ARCHETYPE, PLAIN_ARROW);
    data.extend(prompter.ask(&questions, &data)?);

    let source_id = data.text(RELATIONSHIP_SOURCE);
    let source = elements
        .iter()
        .find(|element| element.identifier() == source_id)
        .with_context(|| format!("Unknown source element {source_id}"))?;
    let arrow = match data.text(RELATIONSHIP_ARCHETYPE).as_str() {
        PLAIN_ARROW => PLAIN_ARROW.to_string(),
        label => format!("--{label}->"),
    };

    let options = CollectOptions::new(ctx.relationship_defaults(RelationshipType::Outgoing));
    let relationships =
        collect_relationships(prompter, &source.name, ctx.snapshot(), &options, &data)?;
    if relationships.is_empty() {
        info!("No relationship selected for {}", source.name);
    }

    let actions = relationship_actions(
        workspace_dir,
        &source_id,
        &element_relationship_file(source),
        &relationships,
        &arrow,
    )?;
    Ok(Plan::new(workspace_dir, data, actions))
}

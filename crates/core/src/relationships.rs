//! Relationship collection
//!
//! Collection is two prompt phases: pick targets, then answer direction,
//! verb and technology for each of them. The second phase comes back as a
//! flat answer map keyed `<TargetIdentifier>_<field>`; [`encode_answer_key`]
//! and [`decode_answer_key`] are the only places that know that encoding.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::naming::same_identifier;
use crate::prompt::{Answers, Choice, Prompter, Question};
use crate::templates::escape_quotes;
use crate::workspace::{EnumerateOptions, ModelElement, WorkspaceSnapshot, enumerate_elements};

/// Question name of the target multi-select
pub const TARGETS_QUESTION: &str = "relationshipTargets";

pub const FIELD_RELATIONSHIP_TYPE: &str = "relationshipType";
pub const FIELD_RELATIONSHIP: &str = "relationship";
pub const FIELD_TECHNOLOGY: &str = "technology";

/// Direction of a relationship relative to the source element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// `target -> source`
    Incoming,
    /// `source -> target`
    Outgoing,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Incoming => "incoming",
            RelationshipType::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(RelationshipType::Incoming),
            "outgoing" => Ok(RelationshipType::Outgoing),
            other => Err(format!("Unknown relationship type: {other}")),
        }
    }
}

/// One relationship from the collected element to a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub relationship: String,
    pub relationship_type: RelationshipType,
    pub technology: String,
}

impl Relationship {
    /// DSL line for this relationship, `arrow` being `->` or an archetype
    /// arrow such as `--https->`.
    pub fn to_dsl(&self, source_id: &str, target_id: &str, arrow: &str) -> String {
        let (from, to) = match self.relationship_type {
            RelationshipType::Outgoing => (source_id, target_id),
            RelationshipType::Incoming => (target_id, source_id),
        };
        format!(
            "{} {} {} \"{}\" \"{}\"",
            from,
            arrow,
            to,
            escape_quotes(&self.relationship),
            escape_quotes(&self.technology)
        )
    }
}

/// Relationships keyed by target identifier
pub type Relationships = BTreeMap<String, Relationship>;

/// Render every relationship as one DSL line each.
pub fn render_relationships(source_id: &str, relationships: &Relationships, arrow: &str) -> String {
    relationships
        .iter()
        .map(|(target, relationship)| relationship.to_dsl(source_id, target, arrow))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pre-filled answers for the follow-up questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDefaults {
    pub relationship_type: RelationshipType,
    pub relationship: String,
    pub technology: String,
}

impl RelationshipDefaults {
    pub fn new(relationship_type: RelationshipType) -> Self {
        Self {
            relationship_type,
            relationship: "Uses".to_string(),
            technology: "Web/HTTP".to_string(),
        }
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = relationship.into();
        self
    }

    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = technology.into();
        self
    }
}

/// Caller policy for one collection run
pub struct CollectOptions<'a> {
    pub defaults: RelationshipDefaults,
    /// Which model collections are offered as targets
    pub scope: EnumerateOptions,
    /// Extra target filter, e.g. excluding the element's own ancestry
    pub filter: Box<dyn Fn(&ModelElement) -> bool + 'a>,
}

impl<'a> CollectOptions<'a> {
    pub fn new(defaults: RelationshipDefaults) -> Self {
        Self {
            defaults,
            scope: EnumerateOptions::default().with_containers().with_components(),
            filter: Box::new(|_: &ModelElement| true),
        }
    }

    pub fn with_scope(mut self, scope: EnumerateOptions) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_filter(mut self, filter: impl Fn(&ModelElement) -> bool + 'a) -> Self {
        self.filter = Box::new(filter);
        self
    }
}

/// `("SomeSystem", "technology")` -> `"SomeSystem_technology"`
pub fn encode_answer_key(target_id: &str, field: &str) -> String {
    format!("{target_id}_{field}")
}

/// Split a flat answer key on its last separator into target and field.
pub fn decode_answer_key(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once('_')
        .filter(|(target, field)| !target.is_empty() && !field.is_empty())
}

/// Group a flat follow-up answer map into per-target relationships.
///
/// Targets missing any of the three fields are dropped.
pub fn decode_relationship_answers(answers: &Answers) -> Relationships {
    let mut fields: BTreeMap<&str, BTreeMap<&str, String>> = BTreeMap::new();
    for (key, value) in answers.iter() {
        match decode_answer_key(key) {
            Some((target, field)) => {
                fields.entry(target).or_default().insert(field, value.to_string());
            }
            None => debug!("Ignoring answer without target prefix: {}", key),
        }
    }

    fields
        .into_iter()
        .filter_map(|(target, mut fields)| {
            let relationship_type = fields
                .get(FIELD_RELATIONSHIP_TYPE)
                .and_then(|value| value.parse::<RelationshipType>().ok());
            let relationship = fields.remove(FIELD_RELATIONSHIP);
            let technology = fields.remove(FIELD_TECHNOLOGY);

            match (relationship_type, relationship, technology) {
                (Some(relationship_type), Some(relationship), Some(technology)) => Some((
                    target.to_string(),
                    Relationship {
                        relationship,
                        relationship_type,
                        technology,
                    },
                )),
                _ => {
                    warn!("Incomplete relationship answers for {}", target);
                    None
                }
            }
        })
        .collect()
}

/// Interactively collect relationships from `element_name` to other model
/// elements.
///
/// Returns an empty map without prompting when no target survives the
/// filters, and an empty map after the first prompt when none is picked.
pub fn collect_relationships(
    prompter: &mut dyn Prompter,
    element_name: &str,
    snapshot: Option<&WorkspaceSnapshot>,
    options: &CollectOptions<'_>,
    context: &Answers,
) -> Result<Relationships> {
    let Some(snapshot) = snapshot else {
        debug!("No snapshot, skipping relationship collection");
        return Ok(Relationships::new());
    };

    let targets: Vec<ModelElement> = enumerate_elements(snapshot, options.scope)
        .into_iter()
        .filter(|element| !same_identifier(&element.name, element_name))
        .filter(|element| (options.filter)(element))
        .collect();

    if targets.is_empty() {
        debug!("No relationship targets available for {}", element_name);
        return Ok(Relationships::new());
    }

    let choices: Vec<Choice> = targets
        .iter()
        .map(|element| Choice::new(element.label(), element.identifier()))
        .collect();
    let selection = prompter.ask(
        &[Question::multi_select(
            TARGETS_QUESTION,
            format!("Which elements does {element_name} relate to?"),
            choices,
        )],
        context,
    )?;

    let selected = selection.list(TARGETS_QUESTION);
    if selected.is_empty() {
        return Ok(Relationships::new());
    }

    let defaults = &options.defaults;
    let mut questions = Vec::with_capacity(selected.len() * 3);
    for target in &selected {
        questions.push(
            Question::select(
                encode_answer_key(target, FIELD_RELATIONSHIP_TYPE),
                format!("Direction of the relationship with {target}?"),
                vec![
                    Choice::new(format!("{element_name} -> {target}"), RelationshipType::Outgoing.as_str()),
                    Choice::new(format!("{target} -> {element_name}"), RelationshipType::Incoming.as_str()),
                ],
            )
            .with_default(defaults.relationship_type.as_str()),
        );
        questions.push(
            Question::input(
                encode_answer_key(target, FIELD_RELATIONSHIP),
                format!("Relationship with {target}?"),
            )
            .with_default(defaults.relationship.as_str()),
        );
        questions.push(
            Question::input(
                encode_answer_key(target, FIELD_TECHNOLOGY),
                format!("Technology of the relationship with {target}?"),
            )
            .with_default(defaults.technology.as_str()),
        );
    }

    let answers = prompter.ask(&questions, context)?;
    Ok(decode_relationship_answers(&answers))
}

//! Prompt contracts shared by every generator
//!
//! Rendering prompts is left to a [`Prompter`] implementation; this module
//! only defines the question shapes, the answer map and the resolution
//! rules both scripted and file-backed prompters follow.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::validation::ValidatorChain;

/// A `{ name, value }` pair offered by list and checklist questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Display label
    pub name: String,
    /// Opaque value stored in the answers
    pub value: String,
}

impl Choice {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single answer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(b) => write!(f, "{b}"),
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        AnswerValue::Bool(b)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        AnswerValue::List(items)
    }
}

/// Answers keyed by question name, also used as template data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn value(&self, name: &str) -> Option<&AnswerValue> {
        self.0.get(name)
    }

    /// Text answer, `None` for lists and flags
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(AnswerValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Text answer or empty string
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Multi-select answer; a text answer counts as a one-item list
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.0.get(name) {
            Some(AnswerValue::List(items)) => items.clone(),
            Some(AnswerValue::Text(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(AnswerValue::Bool(true)))
    }

    /// Rendered form of any answer, as templates see it
    pub fn render_value(&self, name: &str) -> Option<String> {
        self.0.get(name).map(ToString::to_string)
    }

    pub fn extend(&mut self, other: Answers) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AnswerValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Answers(iter.into_iter().collect())
    }
}

/// What kind of input a question expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Input,
    Select(Vec<Choice>),
    MultiSelect(Vec<Choice>),
    Confirm,
}

/// One question of a prompt batch
pub struct Question<'a> {
    pub name: String,
    pub message: String,
    pub kind: QuestionKind,
    pub default: Option<AnswerValue>,
    validator: Option<ValidatorChain<'a>>,
}

impl fmt::Debug for Question<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

impl<'a> Question<'a> {
    fn new(name: impl Into<String>, message: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind,
            default: None,
            validator: None,
        }
    }

    pub fn input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message, QuestionKind::Input)
    }

    pub fn select(name: impl Into<String>, message: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(name, message, QuestionKind::Select(choices))
    }

    pub fn multi_select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self::new(name, message, QuestionKind::MultiSelect(choices))
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>, default: bool) -> Self {
        Self::new(name, message, QuestionKind::Confirm).with_default(default)
    }

    pub fn with_default(mut self, default: impl Into<AnswerValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_validator(mut self, validator: ValidatorChain<'a>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            QuestionKind::Select(choices) | QuestionKind::MultiSelect(choices) => choices,
            _ => &[],
        }
    }

    /// Run the validator chain, if any, against a text input.
    pub fn validate(&self, input: &str, answers: &Answers) -> std::result::Result<(), String> {
        match &self.validator {
            Some(chain) => chain.validate(input, answers),
            None => Ok(()),
        }
    }

    /// Turn a raw provided value (or the default) into a checked answer.
    ///
    /// `answers` is the context seen by validators: earlier answers of the
    /// run plus earlier answers of the same batch.
    pub fn resolve(&self, provided: Option<AnswerValue>, answers: &Answers) -> Result<AnswerValue> {
        let value = provided.or_else(|| self.default.clone());

        match &self.kind {
            QuestionKind::Input => {
                let text = match value {
                    Some(AnswerValue::Text(text)) => text,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                self.validate(&text, answers)
                    .map_err(|msg| Error::Prompt(format!("{}: {}", self.name, msg)))?;
                Ok(AnswerValue::Text(text))
            }
            QuestionKind::Select(choices) => {
                let text = match value {
                    Some(AnswerValue::Text(text)) => text,
                    Some(other) => other.to_string(),
                    None => {
                        return Err(Error::Prompt(format!("{}: no choice made", self.name)));
                    }
                };
                let choice = find_choice(choices, &text).ok_or_else(|| {
                    Error::Prompt(format!("{}: '{}' is not one of the choices", self.name, text))
                })?;
                Ok(AnswerValue::Text(choice.value.clone()))
            }
            QuestionKind::MultiSelect(choices) => {
                let items = match value {
                    Some(AnswerValue::List(items)) => items,
                    Some(AnswerValue::Text(text)) if text.is_empty() => Vec::new(),
                    Some(AnswerValue::Text(text)) => text.split(',').map(|s| s.trim().to_string()).collect(),
                    Some(AnswerValue::Bool(_)) | None => Vec::new(),
                };
                items
                    .iter()
                    .map(|item| {
                        find_choice(choices, item)
                            .map(|choice| choice.value.clone())
                            .ok_or_else(|| {
                                Error::Prompt(format!(
                                    "{}: '{}' is not one of the choices",
                                    self.name, item
                                ))
                            })
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(AnswerValue::List)
            }
            QuestionKind::Confirm => match value {
                Some(AnswerValue::Bool(b)) => Ok(AnswerValue::Bool(b)),
                Some(AnswerValue::Text(text)) => parse_confirm(&text)
                    .map(AnswerValue::Bool)
                    .ok_or_else(|| Error::Prompt(format!("{}: expected yes or no", self.name))),
                _ => Ok(AnswerValue::Bool(false)),
            },
        }
    }
}

/// Match a choice by value first, then by display label.
pub fn find_choice<'c>(choices: &'c [Choice], input: &str) -> Option<&'c Choice> {
    choices
        .iter()
        .find(|choice| choice.value == input)
        .or_else(|| choices.iter().find(|choice| choice.name == input))
}

/// `y`/`yes`/`true` and `n`/`no`/`false`, case-insensitive
pub fn parse_confirm(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Something that can answer a batch of questions.
///
/// Questions of one batch are asked in order; `context` holds answers from
/// earlier batches of the same run and is visible to validators.
pub trait Prompter {
    fn ask(&mut self, questions: &[Question<'_>], context: &Answers) -> Result<Answers>;
}

/// Answer every question of a batch from `provided`, falling back to defaults.
pub fn resolve_batch(
    questions: &[Question<'_>],
    context: &Answers,
    mut provided: impl FnMut(&Question<'_>) -> Option<AnswerValue>,
) -> Result<Answers> {
    let mut seen = context.clone();
    let mut answers = Answers::new();

    for question in questions {
        let value = question.resolve(provided(question), &seen)?;
        debug!("Answered {} = {}", question.name, value);
        seen.insert(question.name.clone(), value.clone());
        answers.insert(question.name.clone(), value);
    }

    Ok(answers)
}

/// Prompter replaying canned answer batches, one per `ask` call.
///
/// Missing answers fall back to question defaults; running out of batches
/// behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    batches: VecDeque<Answers>,
    calls: usize,
}

impl ScriptedPrompter {
    pub fn new(batches: Vec<Answers>) -> Self {
        Self {
            batches: batches.into(),
            calls: 0,
        }
    }

    /// Number of `ask` calls made so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, questions: &[Question<'_>], context: &Answers) -> Result<Answers> {
        self.calls += 1;
        let batch = self.batches.pop_front().ok_or(Error::Aborted)?;
        resolve_batch(questions, context, |question| batch.value(&question.name).cloned())
    }
}

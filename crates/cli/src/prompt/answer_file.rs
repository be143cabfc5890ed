use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use strz_core::prompt::{Answers, Prompter, Question, resolve_batch};

/// Non-interactive prompter answering every question from one JSON object.
///
/// Keys are question names; relationship follow-ups use their flat
/// `<TargetIdentifier>_<field>` names. Unanswered questions take their
/// default, and a failed validation is an error instead of a re-ask.
#[derive(Debug, Clone, Default)]
pub struct AnswerFilePrompter {
    answers: Answers,
}

impl AnswerFilePrompter {
    pub fn new(answers: Answers) -> Self {
        Self { answers }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read answers file {}", path.display()))?;
        let answers = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse answers file {}", path.display()))?;
        Ok(Self::new(answers))
    }
}

impl Prompter for AnswerFilePrompter {
    fn ask(&mut self, questions: &[Question<'_>], context: &Answers) -> strz_core::Result<Answers> {
        resolve_batch(questions, context, |question| {
            self.answers.value(&question.name).cloned()
        })
    }
}

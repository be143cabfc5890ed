use std::io::{self, BufRead, StdinLock, Stdout, Write};

use strz_core::prompt::{AnswerValue, Answers, Prompter, Question, QuestionKind};
use strz_core::{Error, Result};
use tracing::debug;

/// Line-oriented prompter over any reader/writer pair.
///
/// Choices are picked by number, value or label; multi-selects take a comma
/// separated list. An invalid answer prints the validator message and asks
/// again. End of input aborts the run.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask_one(&mut self, question: &Question<'_>, seen: &Answers) -> Result<AnswerValue> {
        loop {
            self.print_question(question)?;
            let line = self.read_line()?;
            let provided = parse_input(question, line.trim());

            match question.resolve(provided, seen) {
                Ok(value) => return Ok(value),
                Err(Error::Prompt(message)) => {
                    debug!("Re-asking {}: {}", question.name, message);
                    writeln!(self.output, "  ✗ {message}")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn print_question(&mut self, question: &Question<'_>) -> Result<()> {
        let hint = match &question.kind {
            QuestionKind::MultiSelect(_) => " (comma separated, empty for none)",
            QuestionKind::Confirm => " (y/n)",
            _ => "",
        };
        match &question.default {
            Some(default) if !default.to_string().is_empty() => {
                writeln!(self.output, "? {}{} [{}]", question.message, hint, default)?
            }
            _ => writeln!(self.output, "? {}{}", question.message, hint)?,
        }
        for (i, choice) in question.choices().iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, choice.name)?;
        }
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Aborted);
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, questions: &[Question<'_>], context: &Answers) -> Result<Answers> {
        let mut seen = context.clone();
        let mut answers = Answers::new();

        for question in questions {
            let value = self.ask_one(question, &seen)?;
            seen.insert(question.name.clone(), value.clone());
            answers.insert(question.name.clone(), value);
        }

        Ok(answers)
    }
}

/// Raw line to a provided value; empty input means "use the default".
fn parse_input(question: &Question<'_>, input: &str) -> Option<AnswerValue> {
    if input.is_empty() {
        return None;
    }

    let by_number = |item: &str| {
        item.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| question.choices().get(i))
            .map(|choice| choice.value.clone())
            .unwrap_or_else(|| item.to_string())
    };

    match &question.kind {
        QuestionKind::Select(_) => Some(AnswerValue::Text(by_number(input))),
        QuestionKind::MultiSelect(_) => Some(AnswerValue::List(
            input
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(by_number)
                .collect(),
        )),
        QuestionKind::Input | QuestionKind::Confirm => Some(AnswerValue::Text(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use strz_core::Choice;
    use strz_core::validation::{ValidatorChain, string_empty};

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_reasks_until_valid() {
        let mut prompter = prompter("\nApi\n");
        let question =
            Question::input("containerName", "Name?").with_validator(ValidatorChain::new().with(string_empty));

        let answers = prompter.ask(&[question], &Answers::new()).unwrap();
        assert_eq!(answers.get("containerName"), Some("Api"));

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert!(output.contains("✗ containerName: Name can't be empty"));
    }

    #[test]
    fn test_select_by_number_and_multi_select() {
        let mut prompter = prompter("2\n1, Banking\n");
        let choices = vec![
            Choice::new("[S]: Banking", "Banking"),
            Choice::new("[P]: Customer", "Customer"),
        ];
        let questions = vec![
            Question::select("source", "Source?", choices.clone()),
            Question::multi_select("targets", "Targets?", choices),
        ];

        let answers = prompter.ask(&questions, &Answers::new()).unwrap();
        assert_eq!(answers.get("source"), Some("Customer"));
        assert_eq!(answers.list("targets"), vec!["Banking", "Banking"]);
    }

    #[test]
    fn test_empty_line_takes_default() {
        let mut prompter = prompter("\n\n");
        let questions = vec![
            Question::input("technology", "Technology?").with_default("Web/HTTP"),
            Question::confirm("external", "External?", true),
        ];

        let answers = prompter.ask(&questions, &Answers::new()).unwrap();
        assert_eq!(answers.get("technology"), Some("Web/HTTP"));
        assert!(answers.flag("external"));
    }

    #[test]
    fn test_end_of_input_aborts() {
        let mut prompter = prompter("");
        let err = prompter
            .ask(&[Question::input("name", "Name?")], &Answers::new())
            .unwrap_err();
        assert!(matches!(err, Error::Aborted));
    }
}

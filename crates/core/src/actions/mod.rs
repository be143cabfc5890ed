//! Generation actions
//!
//! A generator produces a plan of [`Action`]s; the [`ActionExecutor`] is the
//! only place that touches the filesystem. Every action may carry a `when`
//! gate and a `skip` guard, both evaluated before any I/O.

mod executor;

pub use executor::{ActionExecutor, RunSummary};

use std::fmt;
use std::path::PathBuf;

use regex::Regex;

use crate::error::{Error, Result};
use crate::prompt::Answers;

/// Where an action's text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A template registered under this name
    Named(String),
    /// Literal template text
    Inline(String),
}

/// Write a rendered template to `path`
#[derive(Debug, Clone)]
pub struct CreateAction {
    pub path: String,
    pub template: TemplateSource,
    pub skip_if_exists: bool,
}

/// Create a file for every registered template matching `pattern`
#[derive(Debug, Clone)]
pub struct CreateManyAction {
    /// Destination prefix, rendered
    pub destination: String,
    /// Template-name prefix stripped before relocating
    pub base: String,
    /// Glob over registered template names
    pub pattern: String,
    pub skip_if_exists: bool,
}

/// Insert a rendered template into an existing file
#[derive(Debug, Clone)]
pub struct AppendAction {
    pub path: String,
    pub template: TemplateSource,
    /// Insert right after the first match; end of file when absent
    pub pattern: Option<Regex>,
    pub separator: String,
    /// Skip when the rendered text is already present
    pub unique: bool,
    pub create_if_missing: bool,
}

/// The closed set of action kinds
#[derive(Debug, Clone)]
pub enum ActionKind {
    Create(CreateAction),
    CreateMany(CreateManyAction),
    Append(AppendAction),
}

/// Outcome of a `skip` guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDecision {
    Proceed,
    Skip(String),
}

impl From<bool> for SkipDecision {
    fn from(skip: bool) -> Self {
        if skip {
            SkipDecision::Skip("skipped".to_string())
        } else {
            SkipDecision::Proceed
        }
    }
}

impl From<String> for SkipDecision {
    fn from(reason: String) -> Self {
        Some(reason).into()
    }
}

impl From<Option<String>> for SkipDecision {
    fn from(reason: Option<String>) -> Self {
        match reason {
            Some(reason) if !reason.is_empty() => SkipDecision::Skip(reason),
            _ => SkipDecision::Proceed,
        }
    }
}

pub type WhenGuard = Box<dyn Fn(&Answers) -> Result<bool>>;
pub type SkipGuard = Box<dyn Fn(&Answers) -> Result<SkipDecision>>;

/// An action plus its guards
pub struct Action {
    pub kind: ActionKind,
    when: Option<WhenGuard>,
    skip: Option<SkipGuard>,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind)
            .field("when", &self.when.is_some())
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

impl Action {
    fn from_kind(kind: ActionKind) -> Self {
        Self {
            kind,
            when: None,
            skip: None,
        }
    }

    pub fn create(path: impl Into<String>, template: TemplateSource) -> Self {
        Self::from_kind(ActionKind::Create(CreateAction {
            path: path.into(),
            template,
            skip_if_exists: false,
        }))
    }

    pub fn create_many(
        destination: impl Into<String>,
        base: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self::from_kind(ActionKind::CreateMany(CreateManyAction {
            destination: destination.into(),
            base: base.into(),
            pattern: pattern.into(),
            skip_if_exists: false,
        }))
    }

    pub fn append(path: impl Into<String>, template: TemplateSource) -> Self {
        Self::from_kind(ActionKind::Append(AppendAction {
            path: path.into(),
            template,
            pattern: None,
            separator: "\n".to_string(),
            unique: true,
            create_if_missing: false,
        }))
    }

    /// Only for create and create-many
    pub fn skip_if_exists(mut self) -> Self {
        match &mut self.kind {
            ActionKind::Create(action) => action.skip_if_exists = true,
            ActionKind::CreateMany(action) => action.skip_if_exists = true,
            ActionKind::Append(_) => {}
        }
        self
    }

    /// Insertion point for appends; the pattern is a regular expression.
    pub fn after(mut self, pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| Error::InvalidPattern(format!("{pattern}: {e}")))?;
        if let ActionKind::Append(action) = &mut self.kind {
            action.pattern = Some(regex);
        }
        Ok(self)
    }

    pub fn create_if_missing(mut self) -> Self {
        if let ActionKind::Append(action) = &mut self.kind {
            action.create_if_missing = true;
        }
        self
    }

    pub fn allow_duplicates(mut self) -> Self {
        if let ActionKind::Append(action) = &mut self.kind {
            action.unique = false;
        }
        self
    }

    pub fn when(mut self, guard: impl Fn(&Answers) -> Result<bool> + 'static) -> Self {
        self.when = Some(Box::new(guard));
        self
    }

    pub fn skip<D: Into<SkipDecision>>(
        mut self,
        guard: impl Fn(&Answers) -> Result<D> + 'static,
    ) -> Self {
        self.skip = Some(Box::new(move |answers: &Answers| -> Result<SkipDecision> {
            guard(answers).map(Into::into)
        }));
        self
    }

    pub(crate) fn check_when(&self, answers: &Answers) -> Result<bool> {
        match &self.when {
            Some(guard) => guard(answers),
            None => Ok(true),
        }
    }

    pub(crate) fn check_skip(&self, answers: &Answers) -> Result<SkipDecision> {
        match &self.skip {
            Some(guard) => guard(answers),
            None => Ok(SkipDecision::Proceed),
        }
    }

    /// Short human description, paths unrendered
    pub fn describe(&self) -> String {
        match &self.kind {
            ActionKind::Create(action) => format!("create {}", action.path),
            ActionKind::CreateMany(action) => {
                format!("create {} into {}", action.pattern, action.destination)
            }
            ActionKind::Append(action) => format!("append to {}", action.path),
        }
    }
}

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Created(PathBuf),
    Modified(PathBuf),
    Skipped {
        path: Option<PathBuf>,
        reason: String,
    },
}

impl ActionOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ActionOutcome::Skipped { .. })
    }
}

/// Result of one action (or one file of a create-many)
#[derive(Debug)]
pub struct ActionReport {
    pub description: String,
    pub result: Result<ActionOutcome>,
}

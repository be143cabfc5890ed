use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{
    Action, ActionKind, ActionOutcome, ActionReport, AppendAction, CreateAction, CreateManyAction,
    SkipDecision, TemplateSource,
};
use crate::error::{Error, Result};
use crate::prompt::Answers;
use crate::templates::{TemplateRegistry, render};
use crate::utils::{has_content, read_if_present};

/// Reports of one generation run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<ActionReport>,
}

impl RunSummary {
    pub fn performed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(&r.result, Ok(outcome) if !outcome.is_skipped()))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(&r.result, Ok(outcome) if outcome.is_skipped()))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.result.is_err()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Applies actions below a destination directory
pub struct ActionExecutor<'a> {
    destination: PathBuf,
    templates: &'a TemplateRegistry,
    dry_run: bool,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(destination: impl Into<PathBuf>, templates: &'a TemplateRegistry) -> Self {
        Self {
            destination: destination.into(),
            templates,
            dry_run: false,
        }
    }

    /// Evaluate guards and report, but never write
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Run every action in order. A failing action is reported and the run
    /// continues with the next one.
    pub fn run(&self, actions: &[Action], data: &Answers) -> RunSummary {
        let mut summary = RunSummary::default();
        for action in actions {
            summary.reports.extend(self.run_action(action, data));
        }
        info!(
            "Run finished: {} performed, {} skipped, {} failed",
            summary.performed(),
            summary.skipped(),
            summary.failed()
        );
        summary
    }

    fn run_action(&self, action: &Action, data: &Answers) -> Vec<ActionReport> {
        let description = render(&action.describe(), data);
        let report = |result: Result<ActionOutcome>| vec![ActionReport { description: description.clone(), result }];

        match action.check_when(data) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Condition not met: {}", description);
                return report(Ok(ActionOutcome::Skipped {
                    path: None,
                    reason: "condition not met".to_string(),
                }));
            }
            Err(e) => return report(Err(e)),
        }

        match action.check_skip(data) {
            Ok(SkipDecision::Proceed) => {}
            Ok(SkipDecision::Skip(reason)) => {
                info!("Skipping {}: {}", description, reason);
                return report(Ok(ActionOutcome::Skipped { path: None, reason }));
            }
            Err(e) => return report(Err(e)),
        }

        match &action.kind {
            ActionKind::Create(create) => report(self.create(create, data)),
            ActionKind::CreateMany(create_many) => self.create_many(create_many, data),
            ActionKind::Append(append) => report(self.append(append, data)),
        }
    }

    fn template_text(&self, source: &TemplateSource, data: &Answers) -> Result<String> {
        match source {
            TemplateSource::Named(name) => Ok(render(self.templates.get(name)?, data)),
            TemplateSource::Inline(text) => Ok(render(text, data)),
        }
    }

    fn create(&self, action: &CreateAction, data: &Answers) -> Result<ActionOutcome> {
        let path = self.destination.join(render(&action.path, data));
        let text = self.template_text(&action.template, data)?;
        self.write_new(path, &text, action.skip_if_exists)
    }

    fn create_many(&self, action: &CreateManyAction, data: &Answers) -> Vec<ActionReport> {
        let pattern = render(&action.pattern, data);
        let matches = match self.templates.matching(&pattern) {
            Ok(matches) if matches.is_empty() => Err(Error::TemplateNotFound(pattern.clone())),
            other => other,
        };
        let matches = match matches {
            Ok(matches) => matches,
            Err(e) => {
                return vec![ActionReport {
                    description: format!("create {pattern}"),
                    result: Err(e),
                }];
            }
        };

        let destination = PathBuf::from(render(&action.destination, data));
        matches
            .into_iter()
            .map(|(name, template)| {
                let relative = name
                    .strip_prefix(action.base.as_str())
                    .unwrap_or(name)
                    .trim_start_matches('/');
                let relative = render(relative, data);
                let path = self.destination.join(&destination).join(&relative);
                ActionReport {
                    description: format!("create {}", destination.join(&relative).display()),
                    result: self.write_new(path, &render(template, data), action.skip_if_exists),
                }
            })
            .collect()
    }

    fn write_new(&self, path: PathBuf, text: &str, skip_if_exists: bool) -> Result<ActionOutcome> {
        let existed = has_content(&path);
        if existed && skip_if_exists {
            return Ok(ActionOutcome::Skipped {
                path: Some(path),
                reason: "file already exists".to_string(),
            });
        }
        if self.dry_run {
            return Ok(dry_run_outcome(path));
        }

        write_file(&path, text)?;
        if existed {
            warn!("Overwrote {:?}", path);
            Ok(ActionOutcome::Modified(path))
        } else {
            debug!("Created {:?}", path);
            Ok(ActionOutcome::Created(path))
        }
    }

    fn append(&self, action: &AppendAction, data: &Answers) -> Result<ActionOutcome> {
        let path = self.destination.join(render(&action.path, data));
        let text = self.template_text(&action.template, data)?;
        let text = text.trim_end_matches('\n');

        let Some(content) = read_if_present(&path)? else {
            if !action.create_if_missing {
                return Err(Error::NotFound(path));
            }
            if self.dry_run {
                return Ok(dry_run_outcome(path));
            }
            write_file(&path, &format!("{text}\n"))?;
            return Ok(ActionOutcome::Created(path));
        };

        if action.unique && !text.is_empty() && contains_lines(&content, text) {
            return Ok(ActionOutcome::Skipped {
                path: Some(path),
                reason: "already present".to_string(),
            });
        }

        let updated = match &action.pattern {
            Some(pattern) => {
                let Some(found) = pattern.find(&content) else {
                    info!("Pattern {} not found in {:?}", pattern, path);
                    return Ok(ActionOutcome::Skipped {
                        path: Some(path),
                        reason: format!("pattern '{pattern}' not found"),
                    });
                };
                let (before, after) = content.split_at(found.end());
                format!("{before}{}{text}{after}", action.separator)
            }
            None if content.ends_with(action.separator.as_str()) => format!("{content}{text}\n"),
            None => format!("{content}{}{text}\n", action.separator),
        };

        if self.dry_run {
            return Ok(dry_run_outcome(path));
        }
        fs::write(&path, updated)?;
        Ok(ActionOutcome::Modified(path))
    }
}

/// Every line of `text` is already a whole line of `content`
fn contains_lines(content: &str, text: &str) -> bool {
    text.lines()
        .all(|line| content.lines().any(|existing| existing == line))
}

fn dry_run_outcome(path: PathBuf) -> ActionOutcome {
    ActionOutcome::Skipped {
        path: Some(path),
        reason: "dry run".to_string(),
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

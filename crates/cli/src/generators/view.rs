use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use strz_core::actions::Action;
use strz_core::naming::{to_kebab_case, to_pascal_case};
use strz_core::prompt::{Answers, Choice, Prompter, Question};
use strz_core::validation::{ValidatorChain, string_empty, validate_duplicated_views};
use strz_core::workspace::{ElementKind, EnumerateOptions, WORKSPACE_FILE};

use super::{
    GeneratorContext, MODEL_INDENT, Plan, escape_quoted, include_action, markers, name_choices, named,
};

pub const VIEW_KIND: &str = "viewKind";
pub const VIEW_SCOPE: &str = "viewScope";
pub const VIEW_KEY: &str = "viewKey";
pub const VIEW_DESCRIPTION: &str = "viewDescription";

/// Static view kinds this tool scaffolds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    SystemLandscape,
    SystemContext,
    Container,
    Component,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::SystemLandscape,
        ViewKind::SystemContext,
        ViewKind::Container,
        ViewKind::Component,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::SystemLandscape => "systemLandscape",
            ViewKind::SystemContext => "systemContext",
            ViewKind::Container => "container",
            ViewKind::Component => "component",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            ViewKind::SystemLandscape => "view/system-landscape.dsl",
            ViewKind::SystemContext => "view/system-context.dsl",
            ViewKind::Container => "view/container.dsl",
            ViewKind::Component => "view/component.dsl",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown view kind: {s}"))
    }
}

pub fn plan(ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
    let workspace_dir = ctx.workspace_dir()?;

    let mut data = Answers::new();
    data.extend(prompter.ask(
        &[Question::select(
            VIEW_KIND,
            "View kind:",
            ViewKind::ALL
                .iter()
                .map(|kind| Choice::new(kind.as_str(), kind.as_str()))
                .collect(),
        )
        .with_default(ViewKind::SystemLandscape.as_str())],
        &data,
    )?);
    let kind: ViewKind = data.text(VIEW_KIND).parse().map_err(anyhow::Error::msg)?;

    // Scope element candidates depend on the kind
    let scope = match kind {
        ViewKind::SystemLandscape => None,
        ViewKind::SystemContext | ViewKind::Container => Some(ctx.internal_systems()),
        ViewKind::Component => Some(
            ctx.elements(EnumerateOptions::top_level().with_containers())
                .into_iter()
                .filter(|element| element.kind == ElementKind::Container)
                .map(|element| element.name)
                .collect(),
        ),
    };

    let mut questions = Vec::new();
    if let Some(candidates) = &scope {
        if candidates.is_empty() {
            bail!("No element to scope a {kind} view to");
        }
        questions.push(Question::select(VIEW_SCOPE, "Scope element:", name_choices(candidates)));
    }
    questions.push(Question::input(VIEW_KEY, "View key:").with_validator(
        ValidatorChain::new()
            .with(string_empty)
            .with(validate_duplicated_views(ctx.snapshot())),
    ));
    questions.push(Question::input(VIEW_DESCRIPTION, "View description:").with_default(""));
    data.extend(prompter.ask(&questions, &data)?);

    if scope.is_some() {
        let scope_id = to_pascal_case(&data.text(VIEW_SCOPE));
        data.insert("viewScopeId", scope_id);
    }

    let path = format!("views/{}.dsl", to_kebab_case(&data.text(VIEW_KEY)));
    let actions = vec![
        Action::create(&path, named(kind.template())).skip_if_exists(),
        include_action(WORKSPACE_FILE, markers::VIEWS, &path, MODEL_INDENT)?,
    ];

    escape_quoted(&mut data, &[VIEW_KEY, VIEW_DESCRIPTION]);
    Ok(Plan::new(workspace_dir, data, actions))
}

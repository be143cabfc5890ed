//! Prompt flows that turn operator answers into a plan of actions
//!
//! Every generator asks its questions through a [`Prompter`], validates names
//! against the loaded snapshot, and returns a [`Plan`]. Nothing touches the
//! filesystem until the plan is handed to the executor.

pub mod archetype;
pub mod component;
pub mod container;
pub mod init;
pub mod person;
pub mod relationship;
pub mod system;
pub mod view;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use strz_core::actions::{Action, TemplateSource};
use strz_core::naming::{same_identifier, to_kebab_case};
use strz_core::prompt::{Answers, Choice, Prompter};
use strz_core::relationships::{RelationshipDefaults, RelationshipType, Relationships, render_relationships};
use strz_core::templates::escape_quotes;
use strz_core::utils::read_if_present;
use strz_core::workspace::{
    ElementKind, EnumerateOptions, ModelElement, WORKSPACE_FILE, WorkspaceSnapshot,
    enumerate_elements, find_workspace_dir, read_snapshot, resolve_system_containers,
    resolve_systems,
};

use crate::config::Settings;

/// Marker comments include directives are inserted after
pub mod markers {
    pub const ARCHETYPES: &str = "# archetypes";
    pub const PEOPLE: &str = "# people";
    pub const SYSTEMS: &str = "# systems";
    pub const RELATIONSHIPS: &str = "# relationships";
    pub const VIEWS: &str = "# views";
    pub const CONTAINERS: &str = "# containers";
    pub const COMPONENTS: &str = "# components";
}

/// Indentation of includes inside `model { }` and `views { }`
pub(crate) const MODEL_INDENT: &str = "        ";
/// Indentation of includes inside `archetypes { }`
pub(crate) const ARCHETYPE_INDENT: &str = "            ";
/// Indentation of includes inside an element body
pub(crate) const ELEMENT_INDENT: &str = "    ";

/// The generators offered on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Init,
    Person,
    System,
    ExternalSystem,
    Container,
    Component,
    Relationship,
    View,
    Archetype,
}

impl Generator {
    pub fn title(&self) -> &'static str {
        match self {
            Generator::Init => "New workspace",
            Generator::Person => "New person",
            Generator::System => "New software system",
            Generator::ExternalSystem => "New external software system",
            Generator::Container => "New container",
            Generator::Component => "New component",
            Generator::Relationship => "New relationships",
            Generator::View => "New view",
            Generator::Archetype => "New archetype",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Generator::Init => "🚀",
            Generator::Person => "🧑",
            Generator::System | Generator::ExternalSystem => "🏛️",
            Generator::Container => "📦",
            Generator::Component => "🧩",
            Generator::Relationship => "🔗",
            Generator::View => "🖼️",
            Generator::Archetype => "🧬",
        }
    }

    pub fn plan(&self, ctx: &GeneratorContext, prompter: &mut dyn Prompter) -> Result<Plan> {
        match self {
            Generator::Init => init::plan(ctx, prompter),
            Generator::Person => person::plan(ctx, prompter),
            Generator::System => system::plan(ctx, prompter, false),
            Generator::ExternalSystem => system::plan(ctx, prompter, true),
            Generator::Container => container::plan(ctx, prompter),
            Generator::Component => component::plan(ctx, prompter),
            Generator::Relationship => relationship::plan(ctx, prompter),
            Generator::View => view::plan(ctx, prompter),
            Generator::Archetype => archetype::plan(ctx, prompter),
        }
    }
}

/// Resolved workspace state shared by every generator
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    pub settings: Settings,
    /// Directory holding `workspace.dsl`, when one exists
    pub workspace_dir: Option<PathBuf>,
    pub snapshot: Option<WorkspaceSnapshot>,
}

impl GeneratorContext {
    /// Locate the workspace below `settings.cwd` and read its snapshot.
    ///
    /// A missing snapshot is normal; a corrupt one is an error.
    pub fn load(settings: Settings) -> Result<Self> {
        let workspace_dir = find_workspace_dir(&settings.cwd, &settings.workspace_folder);
        let snapshot = read_snapshot(workspace_dir.as_deref())?;
        Ok(Self {
            settings,
            workspace_dir,
            snapshot,
        })
    }

    pub fn workspace_dir(&self) -> Result<&Path> {
        self.workspace_dir.as_deref().ok_or_else(|| {
            anyhow!(
                "No workspace found in {}; run `strz init` first",
                self.settings.cwd.display()
            )
        })
    }

    pub fn snapshot(&self) -> Option<&WorkspaceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn elements(&self, options: EnumerateOptions) -> Vec<ModelElement> {
        self.snapshot()
            .map(|snapshot| enumerate_elements(snapshot, options))
            .unwrap_or_default()
    }

    /// Internal software systems from the snapshot, plus system files the
    /// snapshot does not know about yet.
    pub fn internal_systems(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .elements(EnumerateOptions::top_level())
            .into_iter()
            .filter(|element| element.kind == ElementKind::SoftwareSystem)
            .map(|element| element.name)
            .collect();

        if let Some(dir) = &self.workspace_dir {
            for system in resolve_systems(dir) {
                if !names.iter().any(|name| same_identifier(name, &system.name)) {
                    names.push(system.name);
                }
            }
        }
        names
    }

    /// Containers of `system` from the snapshot and from disk
    pub fn system_containers(&self, system: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .elements(EnumerateOptions::top_level().with_containers())
            .into_iter()
            .filter(|element| element.kind == ElementKind::Container)
            .filter(|element| {
                element
                    .system_name
                    .as_deref()
                    .is_some_and(|owner| same_identifier(owner, system))
            })
            .map(|element| element.name)
            .collect();

        if let Some(dir) = &self.workspace_dir {
            for container in resolve_system_containers(dir, system) {
                if !names.iter().any(|name| same_identifier(name, &container.name)) {
                    names.push(container.name);
                }
            }
        }
        names
    }

    pub fn relationship_defaults(&self, relationship_type: RelationshipType) -> RelationshipDefaults {
        RelationshipDefaults::new(relationship_type)
            .with_relationship(self.settings.default_relationship.clone())
            .with_technology(self.settings.default_technology.clone())
    }
}

/// What a generator wants done, relative to `destination`
#[derive(Debug)]
pub struct Plan {
    pub destination: PathBuf,
    /// Template data
    pub data: Answers,
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn new(destination: impl Into<PathBuf>, data: Answers, actions: Vec<Action>) -> Self {
        Self {
            destination: destination.into(),
            data,
            actions,
        }
    }
}

pub(crate) fn named(template: &str) -> TemplateSource {
    TemplateSource::Named(template.to_string())
}

pub(crate) fn name_choices<'n>(names: impl IntoIterator<Item = &'n String>) -> Vec<Choice> {
    names
        .into_iter()
        .map(|name| Choice::new(name.clone(), name.clone()))
        .collect()
}

/// Escape answers that land inside `"..."` in the rendered DSL.
pub(crate) fn escape_quoted(data: &mut Answers, fields: &[&str]) {
    for field in fields {
        if let Some(escaped) = data.get(field).map(escape_quotes) {
            data.insert(*field, escaped);
        }
    }
}

/// `!include <path>` inserted below `marker` in `file`.
pub(crate) fn include_action(file: &str, marker: &str, include: &str, indent: &str) -> Result<Action> {
    let line = format!("{indent}!include {include}");
    Ok(Action::append(file, TemplateSource::Inline(line)).after(marker)?)
}

/// Stem of an element's relationship file: the kebab names of its owning
/// system and container, then its own.
pub(crate) fn relationship_file(system: Option<&str>, container: Option<&str>, name: &str) -> String {
    [system, container, Some(name)]
        .into_iter()
        .flatten()
        .map(to_kebab_case)
        .collect::<Vec<_>>()
        .join("-")
}

/// [`relationship_file`] for an element of the snapshot
pub(crate) fn element_relationship_file(element: &ModelElement) -> String {
    match element.kind {
        ElementKind::Container | ElementKind::Component => relationship_file(
            element.system_name.as_deref(),
            element.container_name.as_deref(),
            &element.name,
        ),
        _ => relationship_file(None, None, &element.name),
    }
}

/// Actions writing `relationships` to the source's relationship file and
/// including that file in the workspace once.
pub(crate) fn relationship_actions(
    workspace_dir: &Path,
    source_id: &str,
    source_file: &str,
    relationships: &Relationships,
    arrow: &str,
) -> Result<Vec<Action>> {
    if relationships.is_empty() {
        return Ok(Vec::new());
    }

    let file = format!("model/relationships/{source_file}.dsl");
    let lines = render_relationships(source_id, relationships, arrow);

    let workspace_file = workspace_dir.join(WORKSPACE_FILE);
    let directive = format!("!include {file}");
    let include = include_action(WORKSPACE_FILE, markers::RELATIONSHIPS, &file, MODEL_INDENT)?
        .skip(move |_: &Answers| {
            let included = read_if_present(&workspace_file)?
                .is_some_and(|content| content.contains(&directive));
            Ok(included.then(|| "already included".to_string()))
        });

    Ok(vec![
        Action::append(&file, TemplateSource::Inline(lines)).create_if_missing(),
        include,
    ])
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::{GitAuthor, SettingsFile};
    use std::fs;
    use strz_core::workspace::SNAPSHOT_FILE;
    use tempfile::TempDir;

    pub const SNAPSHOT: &str = r#"{
        "name": "Bank",
        "model": {
            "people": [{ "name": "Customer", "tags": "Element,Person" }],
            "softwareSystems": [
                {
                    "name": "Internet Banking",
                    "tags": "Element,Software System",
                    "containers": [
                        {
                            "name": "Api",
                            "tags": "Element,Container",
                            "components": [{ "name": "Login", "tags": "Element,Component" }]
                        }
                    ]
                },
                { "name": "Mainframe", "tags": "Element,Software System,External" }
            ]
        },
        "views": { "systemContextViews": [{ "key": "Context" }] }
    }"#;

    /// Temp workspace laid out the way `strz init` leaves it
    pub fn workspace(snapshot: Option<&str>) -> (TempDir, GeneratorContext) {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("architecture");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(WORKSPACE_FILE), "workspace {\n}\n").unwrap();
        if let Some(snapshot) = snapshot {
            fs::write(dir.join(SNAPSHOT_FILE), snapshot).unwrap();
        }

        let settings = Settings::from_file(
            temp_dir.path(),
            SettingsFile::default(),
            GitAuthor {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
            },
        );
        let ctx = GeneratorContext::load(settings).unwrap();
        (temp_dir, ctx)
    }

    pub fn descriptions(plan: &Plan) -> Vec<String> {
        plan.actions.iter().map(|action| action.describe()).collect()
    }
}

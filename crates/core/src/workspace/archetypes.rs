//! Archetype presets stored under `<workspace>/archetypes/`
//!
//! Each archetype lives in its own file named
//! `<ordinal>_<label>_<kind>.dsl`, e.g. `1_microservice_container.dsl` or
//! `4_https_relationship.dsl`. Ordinals form one sequence shared by every
//! kind and reflect creation order.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::naming::to_kebab_case;
use crate::prompt::Choice;

/// Archetypes folder inside the workspace directory
pub const ARCHETYPES_FOLDER: &str = "archetypes";

/// Model systems folder inside the workspace directory
pub const SYSTEMS_FOLDER: &str = "model/systems";

/// Element kind an archetype (or scanned file) is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseElement {
    Container,
    Component,
    SoftwareSystem,
    Relationship,
}

impl BaseElement {
    pub const ALL: [BaseElement; 4] = [
        BaseElement::Container,
        BaseElement::Component,
        BaseElement::SoftwareSystem,
        BaseElement::Relationship,
    ];

    /// Name used in file names and DSL (`container`, `softwareSystem`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseElement::Container => "container",
            BaseElement::Component => "component",
            BaseElement::SoftwareSystem => "softwareSystem",
            BaseElement::Relationship => "relationship",
        }
    }
}

impl fmt::Display for BaseElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseElement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseElement::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown element kind: {s}"))
    }
}

/// A file-backed element discovered by scanning the workspace tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceElement {
    pub name: String,
    pub parent: Option<String>,
    pub element: BaseElement,
    pub path: PathBuf,
}

/// An archetype offered in a picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeChoice {
    pub position: u32,
    pub label: String,
    /// Label for element archetypes, `--label->` for relationship archetypes
    pub representation: String,
    pub base_element: BaseElement,
    pub path: PathBuf,
}

impl ArchetypeChoice {
    pub fn to_choice(&self) -> Choice {
        Choice::new(self.representation.clone(), self.label.clone())
    }
}

/// Split `<ordinal>_<label>_<kind>.dsl` into its parts.
pub fn parse_archetype_file_name(file_name: &str) -> Option<(u32, String, BaseElement)> {
    let stem = file_name.strip_suffix(".dsl")?;
    let (ordinal, rest) = stem.split_once('_')?;
    let (label, kind) = rest.rsplit_once('_')?;

    let position = ordinal.parse::<u32>().ok()?;
    let base_element = kind.parse::<BaseElement>().ok()?;
    if label.is_empty() {
        return None;
    }

    Some((position, label.to_string(), base_element))
}

/// File name for a new archetype
pub fn archetype_file_name(position: u32, label: &str, base_element: BaseElement) -> String {
    format!("{position}_{label}_{base_element}.dsl")
}

/// Every archetype in the workspace, ordered by position then file name.
///
/// Never fails: a missing or unreadable folder yields an empty list, and
/// files that do not follow the naming grammar are ignored.
pub fn list_archetypes(workspace_path: &Path) -> Vec<ArchetypeChoice> {
    let dir = workspace_path.join(ARCHETYPES_FOLDER);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No archetypes at {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| (entry.file_name().to_string_lossy().to_string(), entry.path()))
        .collect();
    files.sort();

    let mut archetypes: Vec<ArchetypeChoice> = files
        .into_iter()
        .filter_map(|(file_name, path)| match parse_archetype_file_name(&file_name) {
            Some((position, label, base_element)) => {
                let representation = match base_element {
                    BaseElement::Relationship => format!("--{label}->"),
                    _ => label.clone(),
                };
                Some(ArchetypeChoice {
                    position,
                    label,
                    representation,
                    base_element,
                    path,
                })
            }
            None => {
                debug!("Ignoring archetype file with unexpected name: {}", file_name);
                None
            }
        })
        .collect();

    // Stable, so equal positions keep file name order
    archetypes.sort_by_key(|archetype| archetype.position);
    archetypes
}

/// Archetypes of one kind, projected to workspace elements.
pub fn resolve_available_archetype_elements(
    workspace_path: &Path,
    element: BaseElement,
) -> Vec<WorkspaceElement> {
    list_archetypes(workspace_path)
        .into_iter()
        .filter(|archetype| archetype.base_element == element)
        .map(|archetype| WorkspaceElement {
            name: archetype.label,
            parent: None,
            element: archetype.base_element,
            path: archetype.path,
        })
        .collect()
}

/// Picker choices for the given kinds, relationship arrows included.
pub fn archetype_choices(workspace_path: &Path, kinds: &[BaseElement]) -> Vec<Choice> {
    list_archetypes(workspace_path)
        .iter()
        .filter(|archetype| kinds.contains(&archetype.base_element))
        .map(ArchetypeChoice::to_choice)
        .collect()
}

/// Position for the next archetype: one past the count of every kind.
pub fn next_archetype_position(workspace_path: &Path) -> u32 {
    list_archetypes(workspace_path).len() as u32 + 1
}

/// Software systems as found on disk under `model/systems/<system>.dsl`.
pub fn resolve_systems(workspace_path: &Path) -> Vec<WorkspaceElement> {
    scan_dsl_files(&workspace_path.join(SYSTEMS_FOLDER), None, BaseElement::SoftwareSystem)
}

/// Containers of a system as found on disk under
/// `model/systems/<system>/<container>.dsl`.
///
/// Complements the snapshot, which lags behind until the workspace is
/// rebuilt.
pub fn resolve_system_containers(workspace_path: &Path, system_name: &str) -> Vec<WorkspaceElement> {
    let dir = workspace_path.join(SYSTEMS_FOLDER).join(to_kebab_case(system_name));
    scan_dsl_files(&dir, Some(system_name), BaseElement::Container)
}

fn scan_dsl_files(dir: &Path, parent: Option<&str>, element: BaseElement) -> Vec<WorkspaceElement> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut elements: Vec<WorkspaceElement> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "dsl"))
        .filter_map(|path| {
            let name = path.file_stem()?.to_str()?.to_string();
            Some(WorkspaceElement {
                name,
                parent: parent.map(str::to_string),
                element,
                path,
            })
        })
        .collect();
    elements.sort_by(|a, b| a.name.cmp(&b.name));
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_archetypes(root: &Path, files: &[&str]) {
        let dir = root.join(ARCHETYPES_FOLDER);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), "archetype").unwrap();
        }
    }

    #[test]
    fn test_parse_file_name() {
        assert_eq!(
            parse_archetype_file_name("3_spring_boot_container.dsl"),
            Some((3, "spring_boot".to_string(), BaseElement::Container))
        );
        assert_eq!(
            parse_archetype_file_name("12_https_relationship.dsl"),
            Some((12, "https".to_string(), BaseElement::Relationship))
        );
        assert_eq!(parse_archetype_file_name("https_relationship.dsl"), None);
        assert_eq!(parse_archetype_file_name("1_thing_widget.dsl"), None);
        assert_eq!(parse_archetype_file_name("1_app_container.txt"), None);
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_archetypes(temp_dir.path()).is_empty());
        assert_eq!(next_archetype_position(temp_dir.path()), 1);
    }

    #[test]
    fn test_positions_are_shared_across_kinds() {
        let temp_dir = TempDir::new().unwrap();
        write_archetypes(
            temp_dir.path(),
            &["1_app_container.dsl", "2_https_relationship.dsl", "3_saas_softwareSystem.dsl"],
        );

        assert_eq!(next_archetype_position(temp_dir.path()), 4);
    }

    #[test]
    fn test_filter_by_kind_keeps_relative_order() {
        let temp_dir = TempDir::new().unwrap();
        write_archetypes(
            temp_dir.path(),
            &[
                "1_app_container.dsl",
                "2_saas_softwareSystem.dsl",
                "3_https_relationship.dsl",
                "4_service_component.dsl",
                "5_database_container.dsl",
                "6_legacy_softwareSystem.dsl",
                "7_grpc_relationship.dsl",
            ],
        );

        let containers =
            resolve_available_archetype_elements(temp_dir.path(), BaseElement::Container);
        let names: Vec<_> = containers.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["app", "database"]);
        assert!(containers.iter().all(|e| e.element == BaseElement::Container));
    }

    #[test]
    fn test_numeric_position_order() {
        let temp_dir = TempDir::new().unwrap();
        write_archetypes(temp_dir.path(), &["10_late_container.dsl", "2_early_container.dsl"]);

        let labels: Vec<_> = list_archetypes(temp_dir.path())
            .into_iter()
            .map(|a| a.label)
            .collect();
        assert_eq!(labels, vec!["early", "late"]);
    }

    #[test]
    fn test_relationship_representation() {
        let temp_dir = TempDir::new().unwrap();
        write_archetypes(temp_dir.path(), &["1_app_container.dsl", "2_https_relationship.dsl"]);

        let choices = archetype_choices(
            temp_dir.path(),
            &[BaseElement::Container, BaseElement::Relationship],
        );
        let labels: Vec<_> = choices.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(labels, vec!["app", "--https->"]);
        assert_eq!(choices[1].value, "https");
    }

    #[test]
    fn test_system_containers_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(SYSTEMS_FOLDER).join("internet-banking");
        fs::create_dir_all(dir.join("api")).unwrap();
        fs::write(dir.join("api.dsl"), "api").unwrap();
        fs::write(dir.join("web-app.dsl"), "web").unwrap();

        let containers = resolve_system_containers(temp_dir.path(), "Internet Banking");
        let names: Vec<_> = containers.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["api", "web-app"]);
        assert_eq!(containers[0].parent.as_deref(), Some("Internet Banking"));
    }

    #[test]
    fn test_systems_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(SYSTEMS_FOLDER);
        fs::create_dir_all(dir.join("internet-banking")).unwrap();
        fs::write(dir.join("internet-banking.dsl"), "system").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let systems = resolve_systems(temp_dir.path());
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].name, "internet-banking");
        assert_eq!(systems[0].element, BaseElement::SoftwareSystem);
        assert!(systems[0].parent.is_none());
    }
}

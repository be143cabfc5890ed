//! Workspace state resolution
//!
//! Locating the workspace root, reading the compiled snapshot, and projecting
//! the model and archetype presets into flat element lists.

pub mod archetypes;
pub mod enumerate;
pub mod locator;
pub mod snapshot;

pub use archetypes::{
    ArchetypeChoice, BaseElement, WorkspaceElement, archetype_choices, list_archetypes,
    next_archetype_position, parse_archetype_file_name, resolve_available_archetype_elements,
    resolve_system_containers, resolve_systems,
};
pub use enumerate::{ElementKind, EnumerateOptions, ModelElement, enumerate_elements};
pub use locator::{DEFAULT_FOLDER, WORKSPACE_FILE, find_workspace_dir};
pub use snapshot::{
    Component, Configuration, Container, DeploymentNode, Model, Person, SNAPSHOT_FILE,
    SoftwareSystem, View, Views, WorkspaceScope, WorkspaceSnapshot, read_snapshot,
};

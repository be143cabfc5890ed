//! Compiled workspace snapshot (`workspace.json`)
//!
//! The snapshot is produced by an external Structurizr build from the DSL
//! tree. strz only reads it, and only the parts it needs for introspection.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::utils::read_if_present;

/// Snapshot file name inside the workspace directory
pub const SNAPSHOT_FILE: &str = "workspace.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub views: Views,
    #[serde(default)]
    pub configuration: Configuration,
}

impl WorkspaceSnapshot {
    pub fn scope(&self) -> Option<WorkspaceScope> {
        self.configuration.scope
    }

    /// Keys of every view across all view collections.
    pub fn view_keys(&self) -> impl Iterator<Item = &str> {
        self.views.all().filter_map(|view| view.key.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub software_systems: Vec<SoftwareSystem>,
    #[serde(default)]
    pub deployment_nodes: Vec<DeploymentNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl SoftwareSystem {
    pub fn is_external(&self) -> bool {
        has_tag(&self.tags, "External")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub tags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub children: Vec<DeploymentNode>,
}

/// A view entry; only the key matters for collision checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_system_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Views {
    #[serde(default)]
    pub system_landscape_views: Vec<View>,
    #[serde(default)]
    pub system_context_views: Vec<View>,
    #[serde(default)]
    pub container_views: Vec<View>,
    #[serde(default)]
    pub component_views: Vec<View>,
    #[serde(default)]
    pub dynamic_views: Vec<View>,
    #[serde(default)]
    pub deployment_views: Vec<View>,
    #[serde(default)]
    pub filtered_views: Vec<View>,
    #[serde(default)]
    pub image_views: Vec<View>,
    #[serde(default)]
    pub custom_views: Vec<View>,
}

impl Views {
    /// Every view of every collection, collection by collection.
    pub fn all(&self) -> impl Iterator<Item = &View> {
        [
            &self.system_landscape_views,
            &self.system_context_views,
            &self.container_views,
            &self.component_views,
            &self.dynamic_views,
            &self.deployment_views,
            &self.filtered_views,
            &self.image_views,
            &self.custom_views,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<WorkspaceScope>,
}

/// Workspace-level scope flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceScope {
    Landscape,
    SoftwareSystem,
}

impl WorkspaceScope {
    /// Keyword used by the DSL `configuration { scope ... }` block
    pub fn dsl_keyword(&self) -> &'static str {
        match self {
            WorkspaceScope::Landscape => "landscape",
            WorkspaceScope::SoftwareSystem => "softwaresystem",
        }
    }
}

impl fmt::Display for WorkspaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceScope::Landscape => write!(f, "Landscape"),
            WorkspaceScope::SoftwareSystem => write!(f, "SoftwareSystem"),
        }
    }
}

/// Whether a comma-separated tag string carries `tag`.
pub fn has_tag(tags: &str, tag: &str) -> bool {
    tags.split(',').any(|t| t.trim() == tag)
}

/// Load `<workspace_dir>/workspace.json`.
///
/// Returns `Ok(None)` when no workspace was resolved or the snapshot is
/// missing or empty (a fresh workspace). A snapshot that exists but does
/// not parse is an operator error and fails with [`Error::Parse`].
pub fn read_snapshot(workspace_dir: Option<&Path>) -> Result<Option<WorkspaceSnapshot>> {
    let Some(dir) = workspace_dir else {
        debug!("No workspace resolved, snapshot absent");
        return Ok(None);
    };

    let path = dir.join(SNAPSHOT_FILE);
    let Some(contents) = read_if_present(&path)? else {
        debug!("No snapshot at: {:?}", path);
        return Ok(None);
    };

    match serde_json::from_str(&contents) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(source) => {
            error!("Failed to parse snapshot {:?}: {}", path, source);
            Err(Error::Parse { path, source })
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use strz_core::workspace::DEFAULT_FOLDER;
use tracing::debug;

use super::GitAuthor;

/// Optional per-project settings file, looked up in the working directory
pub const SETTINGS_FILE: &str = ".strz.json";

/// On-disk shape of `.strz.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsFile {
    pub workspace_folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    pub default_technology: String,
    pub default_relationship: String,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            workspace_folder: DEFAULT_FOLDER.to_string(),
            templates_dir: None,
            default_technology: "Web/HTTP".to_string(),
            default_relationship: "Uses".to_string(),
        }
    }
}

impl SettingsFile {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }
}

/// Everything a generator needs to know about its environment.
///
/// Built once per invocation and passed down; nothing below the CLI reads
/// the process working directory or git configuration on its own.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cwd: PathBuf,
    pub workspace_folder: String,
    /// Template overrides, resolved against `cwd`
    pub templates_dir: Option<PathBuf>,
    pub default_technology: String,
    pub default_relationship: String,
    pub author: GitAuthor,
    pub dry_run: bool,
}

impl Settings {
    /// Settings for `cwd`, merging `.strz.json` when present.
    pub fn load(cwd: &Path) -> Result<Self> {
        let path = cwd.join(SETTINGS_FILE);
        let file = if path.is_file() {
            debug!("Loading settings from {:?}", path);
            SettingsFile::load_from_file(&path)?
        } else {
            SettingsFile::default()
        };
        Ok(Self::from_file(cwd, file, GitAuthor::read(cwd)))
    }

    pub fn from_file(cwd: &Path, file: SettingsFile, author: GitAuthor) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            workspace_folder: file.workspace_folder,
            templates_dir: file.templates_dir.map(|dir| cwd.join(dir)),
            default_technology: file.default_technology,
            default_relationship: file.default_relationship,
            author,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(temp_dir.path()).unwrap();

        assert_eq!(settings.workspace_folder, "architecture");
        assert_eq!(settings.default_technology, "Web/HTTP");
        assert_eq!(settings.default_relationship, "Uses");
        assert!(settings.templates_dir.is_none());
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{ "workspaceFolder": "docs/c4", "templatesDir": "my-templates" }"#,
        )
        .unwrap();

        let settings = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(settings.workspace_folder, "docs/c4");
        assert_eq!(settings.templates_dir, Some(temp_dir.path().join("my-templates")));
        assert_eq!(settings.default_relationship, "Uses");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE), "{ nope").unwrap();

        let err = Settings::load(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }
}

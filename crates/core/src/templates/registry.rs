//! Named templates, built-in or loaded from an override directory

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Templates keyed by their relative path (`system/system.dsl`)
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    pub fn with(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::TemplateNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates whose name matches a glob pattern, in name order.
    pub fn matching(&self, pattern: &str) -> Result<Vec<(&str, &str)>> {
        let pattern =
            Pattern::new(pattern).map_err(|e| Error::InvalidPattern(format!("{pattern}: {e}")))?;
        Ok(self
            .templates
            .iter()
            .filter(|(name, _)| pattern.matches(name))
            .map(|(name, template)| (name.as_str(), template.as_str()))
            .collect())
    }

    /// Load every file under `dir`, overriding templates with the same
    /// relative name. Returns the number of files loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for entry in WalkDir::new(dir).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let template = fs::read_to_string(entry.path())?;
            debug!("Loaded template override: {}", name);
            self.templates.insert(name, template);
            loaded += 1;
        }
        Ok(loaded)
    }
}

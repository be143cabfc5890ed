//! Built-in templates, compiled into the binary

use anyhow::{Context, Result};
use strz_core::templates::TemplateRegistry;
use tracing::info;

use crate::config::Settings;

macro_rules! builtin {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../templates/", $name)))),*]
    };
}

const BUILTIN_TEMPLATES: &[(&str, &str)] = builtin![
    "workspace/workspace.dsl",
    "workspace/.gitignore",
    "workspace/README.md",
    "person/person.dsl",
    "system/system.dsl",
    "external-system/external-system.dsl",
    "container/container.dsl",
    "component/component.dsl",
    "view/system-landscape.dsl",
    "view/system-context.dsl",
    "view/container.dsl",
    "view/component.dsl",
    "archetype/element.dsl",
    "archetype/relationship.dsl",
];

pub fn builtin_registry() -> TemplateRegistry {
    BUILTIN_TEMPLATES
        .iter()
        .fold(TemplateRegistry::new(), |registry, (name, template)| {
            registry.with(*name, *template)
        })
}

/// Built-ins overlaid with the configured override directory.
pub fn load_registry(settings: &Settings) -> Result<TemplateRegistry> {
    let mut registry = builtin_registry();
    if let Some(dir) = &settings.templates_dir {
        let loaded = registry
            .load_dir(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?;
        info!("Loaded {} template override(s) from {:?}", loaded, dir);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GitAuthor, SettingsFile};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtins_cover_workspace_tree() {
        let registry = builtin_registry();
        let names: Vec<_> = registry
            .matching("workspace/**/*")
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["workspace/.gitignore", "workspace/README.md", "workspace/workspace.dsl"]
        );
        assert!(registry.get("view/container.dsl").is_ok());
    }

    #[test]
    fn test_overrides_replace_builtins() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("tpl/person")).unwrap();
        fs::write(temp_dir.path().join("tpl/person/person.dsl"), "custom").unwrap();

        let file = SettingsFile {
            templates_dir: Some("tpl".into()),
            ..Default::default()
        };
        let settings = Settings::from_file(temp_dir.path(), file, GitAuthor::default());
        let registry = load_registry(&settings).unwrap();

        assert_eq!(registry.get("person/person.dsl").unwrap(), "custom");
        assert_eq!(registry.len(), BUILTIN_TEMPLATES.len());
    }
}

//! Flattened projections of the snapshot model

use std::fmt;

use serde::Serialize;

use super::snapshot::{DeploymentNode, WorkspaceSnapshot, has_tag};
use crate::naming::{component_identifier, component_key, identity_key, to_pascal_case};

/// Classification of a model element, derived from its tag string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    ExternalSystem,
    Container,
    Component,
    DeploymentNode,
}

impl ElementKind {
    /// Classify a comma-separated tag string, most specific tag first.
    pub fn from_tags(tags: &str) -> Self {
        if has_tag(tags, "Deployment Node") {
            ElementKind::DeploymentNode
        } else if has_tag(tags, "Component") {
            ElementKind::Component
        } else if has_tag(tags, "Container") {
            ElementKind::Container
        } else if has_tag(tags, "Person") {
            ElementKind::Person
        } else if has_tag(tags, "External") {
            ElementKind::ExternalSystem
        } else {
            ElementKind::SoftwareSystem
        }
    }

    /// Short marker used in choice labels
    pub fn marker(&self) -> &'static str {
        match self {
            ElementKind::Person => "P",
            ElementKind::SoftwareSystem => "S",
            ElementKind::ExternalSystem => "E",
            ElementKind::Container => "C",
            ElementKind::Component => "Co",
            ElementKind::DeploymentNode => "D",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElementKind::Person => "person",
            ElementKind::SoftwareSystem => "software system",
            ElementKind::ExternalSystem => "external system",
            ElementKind::Container => "container",
            ElementKind::Component => "component",
            ElementKind::DeploymentNode => "deployment node",
        };
        f.write_str(label)
    }
}

/// Which nested collections to flatten into the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerateOptions {
    pub include_containers: bool,
    pub include_components: bool,
    pub include_deployment_nodes: bool,
}

impl EnumerateOptions {
    /// People and software systems only
    pub fn top_level() -> Self {
        Self::default()
    }

    /// Everything the model holds
    pub fn all() -> Self {
        Self {
            include_containers: true,
            include_components: true,
            include_deployment_nodes: true,
        }
    }

    pub fn with_containers(mut self) -> Self {
        self.include_containers = true;
        self
    }

    pub fn with_components(mut self) -> Self {
        self.include_components = true;
        self
    }

    pub fn with_deployment_nodes(mut self) -> Self {
        self.include_deployment_nodes = true;
        self
    }
}

/// One element of the flattened model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelElement {
    pub name: String,
    pub kind: ElementKind,
    /// Tag string exactly as found in the snapshot
    pub tags: String,
    /// Owning system for containers and components
    pub system_name: Option<String>,
    /// Owning container for components
    pub container_name: Option<String>,
    /// Environment for deployment nodes
    pub environment: Option<String>,
}

impl ModelElement {
    fn new(name: &str, tags: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ElementKind::from_tags(tags),
            tags: tags.to_string(),
            system_name: None,
            container_name: None,
            environment: None,
        }
    }

    /// Identifier used inside DSL content
    pub fn identifier(&self) -> String {
        match (&self.kind, &self.container_name) {
            (ElementKind::Component, Some(container)) => component_identifier(container, &self.name),
            _ => to_pascal_case(&self.name),
        }
    }

    /// Collision key; components are scoped by their container
    pub fn key(&self) -> String {
        match (&self.kind, &self.container_name) {
            (ElementKind::Component, Some(container)) => component_key(container, &self.name),
            _ => identity_key(&self.name),
        }
    }

    /// Name of the closest owner, if any
    pub fn parent(&self) -> Option<&str> {
        self.container_name
            .as_deref()
            .or(self.system_name.as_deref())
    }

    /// Choice label such as `[S]: Internet Banking`
    pub fn label(&self) -> String {
        match self.parent() {
            Some(parent) => format!("[{}]: {} ({})", self.kind.marker(), self.name, parent),
            None => format!("[{}]: {}", self.kind.marker(), self.name),
        }
    }
}

/// Flatten the snapshot model according to `options`.
///
/// People come first, then each software system followed by its containers
/// and components, then deployment nodes (depth first). Components are
/// visited through their container even when containers themselves are not
/// part of the output, so component parents are always resolved.
pub fn enumerate_elements(snapshot: &WorkspaceSnapshot, options: EnumerateOptions) -> Vec<ModelElement> {
    let mut elements = Vec::new();

    for person in &snapshot.model.people {
        let mut element = ModelElement::new(&person.name, &person.tags);
        element.kind = ElementKind::Person;
        elements.push(element);
    }

    for system in &snapshot.model.software_systems {
        let mut element = ModelElement::new(&system.name, &system.tags);
        element.kind = if system.is_external() {
            ElementKind::ExternalSystem
        } else {
            ElementKind::SoftwareSystem
        };
        elements.push(element);

        if !options.include_containers && !options.include_components {
            continue;
        }

        for container in &system.containers {
            if options.include_containers {
                let mut element = ModelElement::new(&container.name, &container.tags);
                element.kind = ElementKind::Container;
                element.system_name = Some(system.name.clone());
                elements.push(element);
            }

            if options.include_components {
                for component in &container.components {
                    let mut element = ModelElement::new(&component.name, &component.tags);
                    element.kind = ElementKind::Component;
                    element.system_name = Some(system.name.clone());
                    element.container_name = Some(container.name.clone());
                    elements.push(element);
                }
            }
        }
    }

    if options.include_deployment_nodes {
        for node in &snapshot.model.deployment_nodes {
            push_deployment_node(node, &mut elements);
        }
    }

    elements
}

fn push_deployment_node(node: &DeploymentNode, elements: &mut Vec<ModelElement>) {
    let mut element = ModelElement::new(&node.name, &node.tags);
    element.kind = ElementKind::DeploymentNode;
    element.environment = node.environment.clone();
    elements.push(element);

    for child in &node.children {
        push_deployment_node(child, elements);
    }
}

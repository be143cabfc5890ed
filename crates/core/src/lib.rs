//! strz-core - workspace resolution and generation engine for Structurizr DSL trees
//!
//! This crate provides functionality to:
//! - Locate a DSL workspace and load its compiled JSON snapshot
//! - Enumerate model elements and archetype presets
//! - Validate new names against the existing model across naming conventions
//! - Collect relationships interactively through a [`prompt::Prompter`]
//! - Render templates and execute create / create-many / append actions
pub mod actions;
pub mod error;
pub mod naming;
pub mod prompt;
pub mod relationships;
pub mod templates;
pub mod utils;
pub mod validation;
pub mod workspace;

// Re-export commonly used types
pub use error::{Error, Result};
pub use prompt::{AnswerValue, Answers, Choice, Prompter, Question};
pub use relationships::{Relationship, RelationshipType};
pub use workspace::{
    ArchetypeChoice, BaseElement, ElementKind, EnumerateOptions, ModelElement, WorkspaceElement,
    WorkspaceScope, WorkspaceSnapshot,
};

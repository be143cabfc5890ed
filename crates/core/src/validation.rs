//! Name validators
//!
//! A validator takes the candidate input and the answers collected so far
//! and returns `Ok(())` or a message for the operator. Validators compose
//! into a [`ValidatorChain`] that stops at the first failure.

use crate::naming::{component_key, identity_key, same_identifier};
use crate::prompt::Answers;
use crate::workspace::{ArchetypeChoice, EnumerateOptions, WorkspaceSnapshot, enumerate_elements};

/// Answer key holding the chosen parent system name
pub const SYSTEM_NAME: &str = "systemName";

/// Answer key holding the chosen parent container name
pub const CONTAINER_NAME: &str = "containerName";

pub type ValidationResult = Result<(), String>;

pub type Validator<'a> = Box<dyn Fn(&str, &Answers) -> ValidationResult + 'a>;

/// Validators run in order, short-circuiting on the first failure
#[derive(Default)]
pub struct ValidatorChain<'a> {
    validators: Vec<Validator<'a>>,
}

impl<'a> ValidatorChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Fn(&str, &Answers) -> ValidationResult + 'a) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn validate(&self, input: &str, answers: &Answers) -> ValidationResult {
        for validator in &self.validators {
            validator(input, answers)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Rejects the empty string.
///
/// Whitespace-only input passes; it is not trimmed.
pub fn string_empty(input: &str, _answers: &Answers) -> ValidationResult {
    if input.is_empty() {
        return Err("Name can't be empty".to_string());
    }
    Ok(())
}

/// Rejects a name equal to the already chosen parent system name.
pub fn duplicated_system_name(input: &str, answers: &Answers) -> ValidationResult {
    match answers.get(SYSTEM_NAME) {
        Some(system) if same_identifier(input, system) => Err(format!(
            "Name '{input}' is already used by its parent software system"
        )),
        _ => Ok(()),
    }
}

/// Rejects a name equal to the already chosen parent container name.
pub fn duplicated_container_name(input: &str, answers: &Answers) -> ValidationResult {
    match answers.get(CONTAINER_NAME) {
        Some(container) if same_identifier(input, container) => Err(format!(
            "Name '{input}' is already used by its parent container"
        )),
        _ => Ok(()),
    }
}

/// Rejects a name colliding with any element of the model, containers,
/// components and deployment nodes included.
pub fn validate_duplicated_elements(
    snapshot: Option<&WorkspaceSnapshot>,
) -> impl Fn(&str, &Answers) -> ValidationResult + '_ {
    move |input: &str, _answers: &Answers| {
        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        let key = identity_key(input);
        let duplicate = enumerate_elements(snapshot, EnumerateOptions::all())
            .into_iter()
            .find(|element| identity_key(&element.name) == key);

        match duplicate {
            Some(element) => Err(format!(
                "Element '{}' already exists as a {}",
                element.name, element.kind
            )),
            None => Ok(()),
        }
    }
}

/// Rejects a component name already used inside the chosen container.
///
/// The container comes from the `containerName` answer; components of other
/// containers do not collide.
pub fn validate_duplicated_component_name(
    snapshot: Option<&WorkspaceSnapshot>,
) -> impl Fn(&str, &Answers) -> ValidationResult + '_ {
    move |input: &str, answers: &Answers| {
        let (Some(snapshot), Some(container)) = (snapshot, answers.get(CONTAINER_NAME)) else {
            return Ok(());
        };
        let key = component_key(container, input);
        let exists = enumerate_elements(snapshot, EnumerateOptions::default().with_components())
            .iter()
            .filter(|element| element.container_name.is_some())
            .any(|element| element.key() == key);

        if exists {
            return Err(format!("Component '{input}' already exists in container '{container}'"));
        }
        Ok(())
    }
}

/// Rejects a view key used by any view collection of the snapshot.
pub fn validate_duplicated_views(
    snapshot: Option<&WorkspaceSnapshot>,
) -> impl Fn(&str, &Answers) -> ValidationResult + '_ {
    move |input: &str, _answers: &Answers| {
        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        let key = identity_key(input);
        if snapshot.view_keys().any(|existing| identity_key(existing) == key) {
            return Err(format!("View '{input}' already exists"));
        }
        Ok(())
    }
}

/// Rejects an archetype label already taken by an archetype of any kind.
pub fn validate_duplicated_archetype(
    archetypes: &[ArchetypeChoice],
) -> impl Fn(&str, &Answers) -> ValidationResult + '_ {
    move |input: &str, _answers: &Answers| {
        if archetypes.iter().any(|archetype| same_identifier(&archetype.label, input)) {
            return Err(format!("Archetype '{input}' already exists"));
        }
        Ok(())
    }
}

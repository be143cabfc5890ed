//! Naming conventions bridging file paths and DSL identifiers
//!
//! Every element name shows up in two forms at once: kebab-case for files
//! and directories (`model/systems/payment-service.dsl`) and PascalCase for
//! identifiers inside DSL content (`PaymentService`). Collision checks run
//! in a third form, [`identity_key`], which both of the others map onto.

/// Split a free-form name into words.
///
/// Word boundaries are non-alphanumeric characters, lower-to-upper case
/// transitions (`fooBar`) and the end of an acronym (`HTTPServer`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let lower_to_upper = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `"Payment service"` -> `"PaymentService"`
pub fn to_pascal_case(input: &str) -> String {
    split_words(input).iter().map(|w| capitalize(w)).collect()
}

/// `"Payment service"` -> `"payment-service"`
pub fn to_kebab_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Comparison key for name collisions.
///
/// Two names that differ only by whitespace, separators or letter case map
/// to the same key: `"Test System"`, `"TestSystem"` and `"test-system"` all
/// become `"testsystem"`.
pub fn identity_key(input: &str) -> String {
    to_pascal_case(input).to_lowercase()
}

/// Whether two names denote the same identifier.
pub fn same_identifier(a: &str, b: &str) -> bool {
    identity_key(a) == identity_key(b)
}

/// DSL identifier of a component, scoped by its container.
///
/// Components may share a name across containers, so their identifier is
/// `<ContainerPascal>_<ComponentPascal>`.
pub fn component_identifier(container: &str, component: &str) -> String {
    format!("{}_{}", to_pascal_case(container), to_pascal_case(component))
}

/// Collision key of a component within its container.
pub fn component_key(container: &str, component: &str) -> String {
    format!("{}_{}", identity_key(container), identity_key(component))
}

use strz_core::workspace::ModelElement;

/// `[C]  Api  (Internet Banking)`
pub fn format_element(element: &ModelElement) -> String {
    let marker = format!("[{}]", element.kind.marker());
    let owner = element.parent().or(element.environment.as_deref());
    match owner {
        Some(owner) => format!("{marker:<5}{}  ({owner})", element.name),
        None => format!("{marker:<5}{}", element.name),
    }
}

pub fn print_elements(elements: &[ModelElement]) {
    for element in elements {
        println!("   {}", format_element(element));
    }
    println!("\n{} element(s)", elements.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use strz_core::workspace::{Container, Model, SoftwareSystem, WorkspaceSnapshot};
    use strz_core::workspace::{EnumerateOptions, enumerate_elements};

    #[test]
    fn test_element_lines() {
        let snapshot = WorkspaceSnapshot {
            model: Model {
                software_systems: vec![SoftwareSystem {
                    name: "Banking".into(),
                    tags: "Element,Software System".into(),
                    containers: vec![Container {
                        name: "Api".into(),
                        tags: "Element,Container".into(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        };

        let lines: Vec<String> = enumerate_elements(&snapshot, EnumerateOptions::top_level().with_containers())
            .iter()
            .map(format_element)
            .collect();
        assert_eq!(lines, vec!["[S]  Banking", "[C]  Api  (Banking)"]);
    }
}

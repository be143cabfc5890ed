use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::prompt::Answers;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("valid placeholder regex"));

/// Substitute every `{{field}}` with the matching answer.
///
/// Unknown fields render as the empty string.
pub fn render(template: &str, data: &Answers) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let field = &caps[1];
            data.render_value(field).unwrap_or_else(|| {
                debug!("No value for template field: {}", field);
                String::new()
            })
        })
        .into_owned()
}

/// Escape `"` for use inside a DSL string literal.
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_fields() {
        let data = Answers::new()
            .with("systemIdentifier", "InternetBanking")
            .with("systemName", "Internet Banking");
        let rendered = render(
            r#"{{systemIdentifier}} = softwareSystem "{{ systemName }}""#,
            &data,
        );
        assert_eq!(rendered, r#"InternetBanking = softwareSystem "Internet Banking""#);
    }

    #[test]
    fn test_unknown_fields_render_empty() {
        assert_eq!(render("a{{missing}}b", &Answers::new()), "ab");
    }

    #[test]
    fn test_renders_paths() {
        let data = Answers::new().with("systemPath", "internet-banking");
        assert_eq!(
            render("model/systems/{{systemPath}}.dsl", &data),
            "model/systems/internet-banking.dsl"
        );
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"Say "hi""#), r#"Say \"hi\""#);
        assert_eq!(escape_quotes("plain"), "plain");
    }
}

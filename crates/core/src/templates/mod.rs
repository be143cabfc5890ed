//! Template registry and `{{field}}` substitution

pub mod registry;
pub mod render;

pub use registry::TemplateRegistry;
pub use render::{escape_quotes, render};

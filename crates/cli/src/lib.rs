pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod generators;
pub mod prompt;
pub mod templates;

// Re-export commonly used items
pub use cli::{Cli, Commands, GlobalArgs};
pub use config::Settings;
pub use generators::{Generator, GeneratorContext, Plan};

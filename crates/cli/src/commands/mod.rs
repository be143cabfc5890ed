pub mod generate;
pub mod list;

pub use generate::generate_command;
pub use list::list_command;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Working directory from `--cwd` or the process, canonicalized.
pub(crate) fn resolve_cwd(cwd: Option<&Path>) -> Result<PathBuf> {
    let cwd = match cwd {
        Some(cwd) => cwd.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    cwd.canonicalize()
        .with_context(|| format!("Failed to resolve working directory {}", cwd.display()))
}

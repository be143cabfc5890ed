//! Workspace locator

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::utils::has_content;

/// Canonical workspace descriptor file name
pub const WORKSPACE_FILE: &str = "workspace.dsl";

/// Default subfolder checked when the root holds no descriptor
pub const DEFAULT_FOLDER: &str = "architecture";

/// Find the directory holding a non-empty `workspace.dsl`.
///
/// Probes `<root>/workspace.dsl` first, then `<root>/<folder>/workspace.dsl`
/// where `folder` is the configured workspace folder. No other directory is
/// searched.
pub fn find_workspace_dir(root: &Path, folder: &str) -> Option<PathBuf> {
    let candidates = [root.to_path_buf(), root.join(folder)];

    for dir in candidates {
        if has_content(&dir.join(WORKSPACE_FILE)) {
            debug!("Found workspace at: {:?}", dir);
            return Some(dir);
        }
        debug!("No workspace descriptor in: {:?}", dir);
    }

    None
}

use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Author defaults read once from `git config`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl GitAuthor {
    pub fn read(cwd: &Path) -> Self {
        Self {
            name: git_config(cwd, "user.name"),
            email: git_config(cwd, "user.email"),
        }
    }

    /// `Name <email>`, or whichever half is known
    pub fn display(&self) -> Option<String> {
        match (&self.name, &self.email) {
            (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
            (Some(name), None) => Some(name.clone()),
            (None, Some(email)) => Some(email.clone()),
            (None, None) => None,
        }
    }
}

fn git_config(cwd: &Path, key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .current_dir(cwd)
        .output()
        .map_err(|e| debug!("git unavailable: {}", e))
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

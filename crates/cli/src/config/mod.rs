pub mod git;
pub mod settings;

pub use git::GitAuthor;
pub use settings::{SETTINGS_FILE, Settings, SettingsFile};

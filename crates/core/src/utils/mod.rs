pub mod file;

pub use file::{has_content, read_if_present};

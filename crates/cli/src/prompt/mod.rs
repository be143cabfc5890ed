//! Prompter implementations for the command line

pub mod answer_file;
pub mod terminal;

pub use answer_file::AnswerFilePrompter;
pub use terminal::TerminalPrompter;

pub mod elements;
pub mod report;

pub use elements::{format_element, print_elements};
pub use report::{format_report, print_summary};

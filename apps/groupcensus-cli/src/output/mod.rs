//! Terminal output helpers

mod printer;

pub use printer::{print_header, print_info, print_success, print_summary, print_warning};

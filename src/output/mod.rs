//! Output formatting for store contents.
//!
//! - [`summary`] - per-partition terminal summary and import report

mod summary;

pub use summary::{format_field, format_summary, print_import_report, print_summary};

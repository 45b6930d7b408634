//! Display formatting for terminal output
//!
//! Grid rendering of report results and catalog listings.

pub mod report;

pub use report::{
    format_cell, format_report_details, format_report_list, format_report_table, DisplayOptions,
};

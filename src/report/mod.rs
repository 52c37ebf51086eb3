//! Result table export
//!
//! Writes the collected rows to a spreadsheet-consumable CSV file or
//! JSON. The first row's header is the table contract; every row
//! renders through the same schema.

pub mod writer;

pub use writer::ReportWriter;

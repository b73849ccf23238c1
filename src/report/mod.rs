//! Reporting: rendering predictions and fit summaries for the terminal.

pub mod format;

pub use format::*;

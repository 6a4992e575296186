//! CSV replay format used by the command-line tool.

pub mod balance_writer;
pub mod event_reader;

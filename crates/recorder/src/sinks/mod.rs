//! Sink implementations
//!
//! Contains CsvSink, JsonlSink, and LogSink.

mod csv;
mod jsonl;
mod log;

pub use self::csv::CsvSink;
pub use self::jsonl::JsonlSink;
pub use self::log::LogSink;

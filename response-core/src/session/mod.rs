//! High-level session glue between records and response calculation

pub mod processor;

pub use processor::ResponseSession;

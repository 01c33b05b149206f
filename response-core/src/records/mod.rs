//! Windowed access to recorded oscillograms

pub mod cache;
pub mod source;
pub mod window;

pub use cache::{RecordWindowCache, PAGE_SIZE};
pub use source::{InMemorySource, RecordError, RecordSource, Waveform};
pub use window::RecordWindow;

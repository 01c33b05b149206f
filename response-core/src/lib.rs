//! Oscillogram Response Core
//!
//! Frequency-response calculation and windowed record navigation for
//! validating acoustic-emission sensors against a reference calibration
//! standard.

pub mod config;
pub mod records;
pub mod response;
pub mod session;

pub use config::ResponseConfig;
pub use records::{RecordError, RecordSource, RecordWindowCache};
pub use response::{FrequencyResponse, ResponseEngine};
pub use session::ResponseSession;

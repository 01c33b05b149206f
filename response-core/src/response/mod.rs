//! Calibrated frequency-response calculation

pub mod curve;
pub mod engine;
pub mod fft;
pub mod smoothing;

pub use curve::{band_peak, FrequencyResponse};
pub use engine::ResponseEngine;
pub use fft::FftEngine;
pub use smoothing::smooth_nearest;

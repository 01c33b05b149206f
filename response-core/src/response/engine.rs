//! Calibrated frequency-response calculation
//!
//! Turns one oscillogram plus its per-record calibration coefficient into a
//! response curve in dB relative to the velocity reference

use std::f64::consts::PI;

use crate::config::ResponseConfig;

use super::curve::FrequencyResponse;
use super::fft::FftEngine;
use super::smoothing::smooth_nearest;

/// Clamp floor for spectrum magnitudes before the velocity log
const MAG_EPSILON: f64 = 1e-10;

/// Clamp floor for the peak-microvolt term of the sensitivity log
const SENSITIVITY_EPSILON: f64 = 1e-12;

/// Substitute frequency for bin 0 when the spectrum has a single bin
const SINGLE_BIN_FREQ_KHZ: f64 = 1e-10;

/// Response calculator with a planned FFT for the configured transform length
///
/// Holds no shared state; hosts that parallelize run one engine per worker.
pub struct ResponseEngine {
    config: ResponseConfig,
    fft: FftEngine,
}

impl ResponseEngine {
    /// Create an engine for the given configuration snapshot
    pub fn new(config: &ResponseConfig) -> Self {
        Self {
            config: config.clone(),
            fft: FftEngine::new(config.fft_size),
        }
    }

    /// Get the active configuration snapshot
    pub fn config(&self) -> &ResponseConfig {
        &self.config
    }

    /// Replace the configuration snapshot
    ///
    /// The FFT is replanned only when the transform length changed.
    pub fn update_config(&mut self, config: &ResponseConfig) {
        if config.fft_size != self.config.fft_size {
            self.fft = FftEngine::new(config.fft_size);
        }
        self.config = config.clone();
    }

    /// Compute the calibrated response curve of one record
    ///
    /// # Arguments
    /// * `waveform` - Record samples in ADC units
    /// * `calibration_coefficient` - ADC-to-microvolt factor of this record
    /// * `sample_freq_khz` - Sampling frequency of this record in kHz
    ///
    /// # Returns
    /// Curve of exactly `fft_size / 2` bins. Deterministic: identical inputs
    /// produce bit-identical curves, and every output value is finite (log
    /// arguments are clamped to a positive floor instead of reaching zero).
    pub fn compute(
        &mut self,
        waveform: &[f64],
        calibration_coefficient: f64,
        sample_freq_khz: f64,
    ) -> FrequencyResponse {
        // Absolute sensitivity from the peak ADC amplitude in microvolts.
        // The clamp keeps an all-zero record finite.
        let peak_adc = waveform.iter().fold(0.0_f64, |max, &s| max.max(s.abs()));
        let peak_microvolts = (peak_adc * calibration_coefficient).max(SENSITIVITY_EPSILON);
        let sref = 20.0 * peak_microvolts.log10() - self.config.ref_gt200 + self.config.s_gt200;

        let magnitudes = self.fft.compute_magnitude(waveform);
        let frequencies = self.fft.frequency_axis_khz(sample_freq_khz);
        let num_bins = magnitudes.len();

        // Velocity spectrum in dB. Bin 0 substitutes the first non-zero
        // frequency so the 2*pi*f division stays defined.
        let f0_substitute = if num_bins > 1 {
            frequencies[1]
        } else {
            SINGLE_BIN_FREQ_KHZ
        };
        let velocity_db: Vec<f64> = magnitudes
            .iter()
            .zip(&frequencies)
            .map(|(&mag, &freq)| {
                let f_safe = if freq > 0.0 { freq } else { f0_substitute };
                20.0 * (mag.max(MAG_EPSILON) / (2.0 * PI * f_safe)).log10()
            })
            .collect();

        let velocity_db = smooth_nearest(&velocity_db, self.config.smooth_window);

        // The normalization region excludes the low-frequency bins; its
        // maximum is pinned at sref. A degenerate maximum (empty region,
        // non-finite or non-positive) leaves the curve unscaled.
        let mut region_peak: Option<(usize, f64)> = None;
        for (bin, &value) in velocity_db.iter().enumerate().skip(self.config.skip_bins) {
            match region_peak {
                Some((_, best)) if value <= best => {}
                _ => region_peak = Some((bin, value)),
            }
        }

        let (reference_scale, peak_frequency_khz) = match region_peak {
            Some((peak_bin, max_value)) => {
                let scale = if max_value.is_finite() && max_value > 0.0 {
                    sref / max_value
                } else {
                    1.0
                };
                let peak_freq = if peak_bin < num_bins {
                    frequencies[peak_bin]
                } else {
                    0.0
                };
                (scale, peak_freq)
            }
            None => (1.0, 0.0),
        };

        let amplitudes_db = velocity_db.iter().map(|&v| v * reference_scale).collect();

        FrequencyResponse {
            frequencies_khz: frequencies,
            amplitudes_db,
            absolute_sensitivity_db: sref,
            peak_frequency_khz,
            reference_scale,
        }
    }
}

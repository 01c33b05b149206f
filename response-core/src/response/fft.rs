//! FFT engine using realfft for real-valued oscillograms
//!
//! One planned transform per engine; buffers are reused across records

use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued records with a fixed transform length
pub struct FftEngine {
    /// Transform length in samples
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<num_complex::Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - Transform length (should be a power of 2)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = vec![0.0; fft_size];
        let output_buffer = vec![num_complex::Complex::new(0.0, 0.0); fft_size / 2 + 1];

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Compute the one-sided magnitude spectrum |X[k]| for k = 0..fft_size/2
    ///
    /// # Arguments
    /// * `signal` - Input record (zero-padded if shorter than `fft_size`,
    ///   truncated to its first `fft_size` samples if longer)
    ///
    /// # Returns
    /// Magnitude spectrum of exactly `fft_size / 2` bins
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Vec<f64> {
        // Copy signal to input buffer with zero-padding
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        if copy_len < self.fft_size {
            self.input_buffer[copy_len..].fill(0.0);
        }

        // Compute FFT
        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .expect("FFT processing failed");

        // Calculate magnitude, dropping the Nyquist bin
        self.output_buffer
            .iter()
            .take(self.num_bins())
            .map(|c| c.norm())
            .collect()
    }

    /// Get transform length
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of one-sided spectrum bins (fft_size / 2)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert bin index to frequency in kHz
    ///
    /// # Arguments
    /// * `bin` - Bin index
    /// * `sample_freq_khz` - Sampling frequency in kHz
    pub fn bin_frequency_khz(&self, bin: usize, sample_freq_khz: f64) -> f64 {
        bin as f64 * sample_freq_khz / self.fft_size as f64
    }

    /// Get frequency axis in kHz for the one-sided spectrum
    pub fn frequency_axis_khz(&self, sample_freq_khz: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.bin_frequency_khz(bin, sample_freq_khz))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(1024);

        // DC signal (constant)
        let signal = vec![1.0; 100];
        let spectrum = fft.compute_magnitude(&signal);

        assert_eq!(spectrum.len(), 512);

        // DC bin (k=0) carries the full sample sum
        assert!((spectrum[0] - 100.0).abs() < 1e-9);

        // DC stays the global maximum; the leakage envelope has decayed
        // to a fraction of it by the top of the spectrum
        assert!(spectrum.iter().skip(1).all(|&m| m < spectrum[0]));
        assert!(spectrum[511] < 1.0);
    }

    #[test]
    fn test_fft_sine_wave() {
        let mut fft = FftEngine::new(1024);

        // Sine wave landing exactly on bin 64
        let signal: Vec<f64> = (0..1024)
            .map(|n| (2.0 * PI * 64.0 * n as f64 / 1024.0).sin())
            .collect();

        let spectrum = fft.compute_magnitude(&signal);

        let (peak_bin, &peak_mag) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert_eq!(peak_bin, 64);

        // Peak magnitude should be N/2 for a full-scale sine wave
        assert!((peak_mag - 512.0).abs() < 1.0);
    }

    #[test]
    fn test_truncates_long_signal() {
        let mut fft = FftEngine::new(256);

        let signal = vec![1.0; 10_000];
        let spectrum = fft.compute_magnitude(&signal);

        assert_eq!(spectrum.len(), 128);

        // Truncation keeps the first 256 samples, so DC magnitude is 256
        assert!((spectrum[0] - 256.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_axis() {
        let fft = FftEngine::new(1024);
        let freqs = fft.frequency_axis_khz(1000.0);

        assert_eq!(freqs.len(), 512);
        assert_eq!(freqs[0], 0.0); // DC
        assert!((freqs[1] - 1000.0 / 1024.0).abs() < 1e-12);
        assert!((freqs[511] - 511.0 * 1000.0 / 1024.0).abs() < 1e-9);
    }
}

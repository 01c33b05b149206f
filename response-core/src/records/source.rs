//! Record source contract and error types
//!
//! The proprietary record-file reader lives outside this crate and is seen
//! here only through the `RecordSource` trait

use thiserror::Error;

/// One recorded oscillogram: raw ADC samples
pub type Waveform = Vec<f64>;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("no record at index {index} (record set holds {total})")]
    InvalidIndex { index: usize, total: usize },

    #[error("source fetch failed for records {start}..{end}: {reason}")]
    SourceFetch {
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("source returned {actual} records for {start}..{end}, expected {expected}")]
    BatchMismatch {
        start: usize,
        end: usize,
        expected: usize,
        actual: usize,
    },
}

/// Batch access to a set of recorded oscillograms
///
/// `fetch_waveforms` and `fetch_calibration` must return index-aligned
/// sequences covering exactly `start..end`.
pub trait RecordSource {
    /// Total number of records available
    fn record_count(&self) -> usize;

    /// Waveforms of the records in `start..end`
    fn fetch_waveforms(&mut self, start: usize, end: usize) -> Result<Vec<Waveform>, RecordError>;

    /// ADC-to-microvolt coefficients of the records in `start..end`
    fn fetch_calibration(&mut self, start: usize, end: usize) -> Result<Vec<f64>, RecordError>;

    /// Sampling frequency of one record in kHz, when the source knows it
    fn sample_frequency_khz(&mut self, index: usize) -> Option<f64>;
}

/// In-memory source for tests and deterministic playback
pub struct InMemorySource {
    waveforms: Vec<Waveform>,
    calibration: Vec<f64>,
    sample_freq_khz: Option<f64>,
}

impl InMemorySource {
    /// Create a source over pre-loaded records
    ///
    /// # Panics
    /// When the waveform and calibration sequences are not index-aligned.
    pub fn new(waveforms: Vec<Waveform>, calibration: Vec<f64>) -> Self {
        assert_eq!(
            waveforms.len(),
            calibration.len(),
            "waveforms and calibration must be index-aligned"
        );
        Self {
            waveforms,
            calibration,
            sample_freq_khz: None,
        }
    }

    /// Report the given sampling frequency for every record
    pub fn with_sample_frequency(mut self, khz: f64) -> Self {
        self.sample_freq_khz = Some(khz);
        self
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), RecordError> {
        if start > end || end > self.waveforms.len() {
            return Err(RecordError::SourceFetch {
                start,
                end,
                reason: "range outside the record set".into(),
            });
        }
        Ok(())
    }
}

impl RecordSource for InMemorySource {
    fn record_count(&self) -> usize {
        self.waveforms.len()
    }

    fn fetch_waveforms(&mut self, start: usize, end: usize) -> Result<Vec<Waveform>, RecordError> {
        self.check_range(start, end)?;
        Ok(self.waveforms[start..end].to_vec())
    }

    fn fetch_calibration(&mut self, start: usize, end: usize) -> Result<Vec<f64>, RecordError> {
        self.check_range(start, end)?;
        Ok(self.calibration[start..end].to_vec())
    }

    fn sample_frequency_khz(&mut self, index: usize) -> Option<f64> {
        if index < self.waveforms.len() {
            self.sample_freq_khz
        } else {
            None
        }
    }
}

//! Resident record window

use super::source::Waveform;

/// One contiguous block of records held in memory
///
/// Global indices map to local offsets by subtracting `start`; the waveform
/// and calibration sequences are index-aligned.
#[derive(Debug, Clone, Default)]
pub struct RecordWindow {
    start: usize,
    waveforms: Vec<Waveform>,
    calibration: Vec<f64>,
}

impl RecordWindow {
    /// Build a window starting at global index `start`
    pub fn new(start: usize, waveforms: Vec<Waveform>, calibration: Vec<f64>) -> Self {
        debug_assert_eq!(waveforms.len(), calibration.len());
        Self {
            start,
            waveforms,
            calibration,
        }
    }

    /// First global index of the window
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last global index of the window
    pub fn end(&self) -> usize {
        self.start + self.waveforms.len()
    }

    /// Number of resident records
    pub fn len(&self) -> usize {
        self.waveforms.len()
    }

    /// Check if the window holds no records
    pub fn is_empty(&self) -> bool {
        self.waveforms.is_empty()
    }

    /// Check if a global index is resident
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    /// Waveform and calibration coefficient at a global index
    pub fn record(&self, index: usize) -> Option<(&[f64], f64)> {
        if !self.contains(index) {
            return None;
        }
        let local = index - self.start;
        Some((&self.waveforms[local], self.calibration[local]))
    }
}

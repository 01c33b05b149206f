//! Windowed record navigation backed by an external source
//!
//! Exactly one contiguous window is resident at any time; a boundary
//! crossing replaces it wholesale with a single batch fetch. No prefetching.

use super::source::{RecordError, RecordSource};
use super::window::RecordWindow;

/// Records fetched per page
pub const PAGE_SIZE: usize = 500;

/// Paged view over an arbitrarily large record set
///
/// Navigation is synchronous and must be serialized by the caller. A failed
/// fetch leaves the previously resident window and the current index intact.
pub struct RecordWindowCache<S: RecordSource> {
    source: S,
    total: usize,
    page_size: usize,
    window: RecordWindow,
    current: usize,
}

impl<S: RecordSource> RecordWindowCache<S> {
    /// Open a source and load the first page
    pub fn open(source: S) -> Result<Self, RecordError> {
        Self::with_page_size(source, PAGE_SIZE)
    }

    /// Open with a custom page size
    pub fn with_page_size(mut source: S, page_size: usize) -> Result<Self, RecordError> {
        assert!(page_size > 0, "page size must be positive");
        let total = source.record_count();
        let end = total.min(page_size);
        let window = fetch_window(&mut source, 0, end)?;
        log::info!("opened record cache: {} records, resident window 0..{}", total, end);
        Ok(Self {
            source,
            total,
            page_size,
            window,
            current: 0,
        })
    }

    /// Total number of records in the source
    pub fn record_count(&self) -> usize {
        self.total
    }

    /// Global index of the current record
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Global range `(start, end)` of the resident window
    pub fn window_range(&self) -> (usize, usize) {
        (self.window.start(), self.window.end())
    }

    /// Move to the next record, paging forward on a window-edge crossing
    pub fn advance(&mut self) -> Result<(), RecordError> {
        let target = self.current + 1;
        if target >= self.total {
            return Err(RecordError::InvalidIndex {
                index: target,
                total: self.total,
            });
        }
        if target >= self.window.end() {
            let end = self.total.min(self.window.end() + self.page_size);
            self.replace_window(self.window.end(), end)?;
        }
        self.current = target;
        Ok(())
    }

    /// Move to the previous record, paging backward on a window-edge crossing
    ///
    /// At the first record this is a no-op; the window is not touched.
    pub fn retreat(&mut self) -> Result<(), RecordError> {
        if self.current == 0 {
            return Ok(());
        }
        let target = self.current - 1;
        if target < self.window.start() {
            let start = self.window.start().saturating_sub(self.page_size);
            self.replace_window(start, self.window.start())?;
        }
        self.current = target;
        Ok(())
    }

    /// Jump to an arbitrary record
    ///
    /// Targets inside the resident window only move the index; anything else
    /// fetches the page-aligned window containing `index` and replaces the
    /// resident one.
    pub fn seek(&mut self, index: usize) -> Result<(), RecordError> {
        if index >= self.total {
            return Err(RecordError::InvalidIndex {
                index,
                total: self.total,
            });
        }
        if !self.window.contains(index) {
            let start = (index / self.page_size) * self.page_size;
            let end = self.total.min(start + self.page_size);
            self.replace_window(start, end)?;
        }
        self.current = index;
        Ok(())
    }

    /// Waveform and calibration coefficient of the current record
    pub fn current_record(&self) -> Result<(&[f64], f64), RecordError> {
        self.window
            .record(self.current)
            .ok_or(RecordError::InvalidIndex {
                index: self.current,
                total: self.total,
            })
    }

    /// Sampling frequency of one record in kHz, when the source knows it
    pub fn sample_frequency_khz(&mut self, index: usize) -> Option<f64> {
        self.source.sample_frequency_khz(index)
    }

    fn replace_window(&mut self, start: usize, end: usize) -> Result<(), RecordError> {
        self.window = fetch_window(&mut self.source, start, end)?;
        log::debug!("resident window replaced: {}..{}", start, end);
        Ok(())
    }
}

/// Fetch a fully aligned window, leaving the caller's state untouched on error
fn fetch_window<S: RecordSource>(
    source: &mut S,
    start: usize,
    end: usize,
) -> Result<RecordWindow, RecordError> {
    let expected = end - start;

    let waveforms = source.fetch_waveforms(start, end)?;
    if waveforms.len() != expected {
        return Err(RecordError::BatchMismatch {
            start,
            end,
            expected,
            actual: waveforms.len(),
        });
    }

    let calibration = source.fetch_calibration(start, end)?;
    if calibration.len() != expected {
        return Err(RecordError::BatchMismatch {
            start,
            end,
            expected,
            actual: calibration.len(),
        });
    }

    Ok(RecordWindow::new(start, waveforms, calibration))
}

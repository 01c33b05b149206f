//! Session wiring: record navigation feeding the response engine

use crate::config::ResponseConfig;
use crate::records::{RecordError, RecordSource, RecordWindowCache};
use crate::response::{FrequencyResponse, ResponseEngine};

/// One inspection session over a record source
///
/// Owns the resident record window, the configuration snapshot and the
/// planned engine; every navigation call answers with the calibrated curve
/// of the record it landed on. Single-threaded by design, callers serialize
/// navigation.
pub struct ResponseSession<S: RecordSource> {
    cache: RecordWindowCache<S>,
    engine: ResponseEngine,
    config: ResponseConfig,
}

impl<S: RecordSource> ResponseSession<S> {
    /// Open a source with the given configuration snapshot
    pub fn open(source: S, config: ResponseConfig) -> Result<Self, RecordError> {
        let cache = RecordWindowCache::open(source)?;
        let engine = ResponseEngine::new(&config);
        Ok(Self {
            cache,
            engine,
            config,
        })
    }

    /// Total number of records in the source
    pub fn record_count(&self) -> usize {
        self.cache.record_count()
    }

    /// Global index of the current record
    pub fn current_index(&self) -> usize {
        self.cache.current_index()
    }

    /// Get the active configuration snapshot
    pub fn config(&self) -> &ResponseConfig {
        &self.config
    }

    /// Swap in a fresh configuration snapshot
    ///
    /// The previous snapshot is replaced wholesale; curves computed before
    /// the reload are unaffected.
    pub fn reload_config(&mut self, config: ResponseConfig) {
        self.engine.update_config(&config);
        self.config = config;
    }

    /// Calibrated curve of the record the session currently points at
    ///
    /// Records without their own sampling frequency fall back to the
    /// configured default.
    pub fn current_response(&mut self) -> Result<FrequencyResponse, RecordError> {
        let index = self.cache.current_index();
        let sample_freq = self
            .cache
            .sample_frequency_khz(index)
            .unwrap_or(self.config.default_sample_freq_khz);
        let (waveform, coefficient) = self.cache.current_record()?;
        Ok(self.engine.compute(waveform, coefficient, sample_freq))
    }

    /// Current curve cut to the configured display band
    pub fn current_display_points(&mut self) -> Result<Vec<(f64, f64)>, RecordError> {
        let [lo, hi] = self.config.freq_range;
        Ok(self.current_response()?.clip_to_band(lo, hi))
    }

    /// Move to the next record and compute its curve
    pub fn advance(&mut self) -> Result<FrequencyResponse, RecordError> {
        self.cache.advance()?;
        self.current_response()
    }

    /// Move to the previous record and compute its curve
    pub fn retreat(&mut self) -> Result<FrequencyResponse, RecordError> {
        self.cache.retreat()?;
        self.current_response()
    }

    /// Jump to an arbitrary record and compute its curve
    pub fn seek(&mut self, index: usize) -> Result<FrequencyResponse, RecordError> {
        self.cache.seek(index)?;
        self.current_response()
    }
}

//! Response-calculation configuration: defaults, file discovery, merge
//!
//! Configuration problems are absorbed, never surfaced: a missing or broken
//! file falls through to the next candidate and finally to the defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched in the application and per-user directories
pub const CONFIG_FILE_NAME: &str = "response_config.json";

/// Per-user directory under the platform application-data root
const APP_DATA_DIR: &str = "osc-response";

fn default_ref_gt200() -> f64 {
    92.0
}

fn default_s_gt200() -> f64 {
    65.0
}

fn default_unit_adc() -> f64 {
    3.05
}

fn default_sample_freq_khz() -> f64 {
    1000.0
}

fn default_fft_size() -> usize {
    8192
}

fn default_smooth_window() -> usize {
    50
}

fn default_skip_bins() -> usize {
    300
}

fn default_freq_range() -> [f64; 2] {
    [50.0, 500.0]
}

fn default_db_range() -> [f64; 2] {
    [10.0, 70.0]
}

/// Immutable snapshot of the response-calculation parameters
///
/// Keys present in a configuration file overlay these defaults; unknown keys
/// are ignored and absent keys keep their default. A reload produces a fresh
/// snapshot, the value itself is never mutated in place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseConfig {
    /// Reference standard level in dB
    #[serde(rename = "refGT200", default = "default_ref_gt200")]
    pub ref_gt200: f64,

    /// Reference standard sensitivity in dB
    #[serde(rename = "SGT200", default = "default_s_gt200")]
    pub s_gt200: f64,

    /// ADC unit scale in microvolts, carried for hosts; the curve math does
    /// not consume it
    #[serde(rename = "unitADC", default = "default_unit_adc")]
    pub unit_adc: f64,

    /// Fallback sampling frequency in kHz for records without their own
    #[serde(rename = "fD_kHz", default = "default_sample_freq_khz")]
    pub default_sample_freq_khz: f64,

    /// Transform length, a power of two
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,

    /// Moving-average width in bins; 1 or less disables smoothing
    #[serde(default = "default_smooth_window")]
    pub smooth_window: usize,

    /// Low-frequency bins excluded from normalization and peak search
    #[serde(default = "default_skip_bins")]
    pub skip_bins: usize,

    /// Display frequency band [lo, hi] in kHz
    #[serde(default = "default_freq_range")]
    pub freq_range: [f64; 2],

    /// Display amplitude band [lo, hi] in dB
    #[serde(default = "default_db_range")]
    pub db_range: [f64; 2],
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            ref_gt200: default_ref_gt200(),
            s_gt200: default_s_gt200(),
            unit_adc: default_unit_adc(),
            default_sample_freq_khz: default_sample_freq_khz(),
            fft_size: default_fft_size(),
            smooth_window: default_smooth_window(),
            skip_bins: default_skip_bins(),
            freq_range: default_freq_range(),
            db_range: default_db_range(),
        }
    }
}

impl ResponseConfig {
    /// Round a file-supplied transform length up to a power of two
    ///
    /// Every other degenerate value is tolerated by the engine's own guards.
    fn sanitized(mut self) -> Self {
        if !self.fft_size.is_power_of_two() {
            let rounded = self.fft_size.max(2).next_power_of_two();
            log::warn!(
                "configured fft_size {} is not a power of two, using {}",
                self.fft_size,
                rounded
            );
            self.fft_size = rounded;
        }
        self
    }
}

/// Load configuration from the standard search locations
///
/// Search order: file beside the executable, then the per-user application
/// data directory, then built-in defaults. Never fails.
pub fn load() -> ResponseConfig {
    load_candidates(&candidate_paths(None))
}

/// Load configuration preferring `path` over the standard locations
///
/// A missing or malformed explicit file falls through to the standard
/// search, exactly like any other candidate. Never fails.
pub fn load_from(path: impl AsRef<Path>) -> ResponseConfig {
    load_candidates(&candidate_paths(Some(path.as_ref())))
}

fn load_candidates(candidates: &[PathBuf]) -> ResponseConfig {
    for candidate in candidates {
        if let Some(config) = try_read(candidate) {
            log::info!("loaded response configuration from {}", candidate.display());
            return config.sanitized();
        }
    }
    ResponseConfig::default()
}

fn try_read(path: &Path) -> Option<ResponseConfig> {
    if !path.is_file() {
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("skipping unreadable config {}: {}", path.display(), err);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("skipping malformed config {}: {}", path.display(), err);
            None
        }
    }
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| {
        exe.parent().map(Path::to_path_buf)
    }) {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    if let Some(base) = app_data_dir() {
        paths.push(base.join(APP_DATA_DIR).join(CONFIG_FILE_NAME));
    }
    paths
}

// Cross-platform application-data discovery
fn app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ResponseConfig::default();
        assert_eq!(config.ref_gt200, 92.0);
        assert_eq!(config.s_gt200, 65.0);
        assert_eq!(config.unit_adc, 3.05);
        assert_eq!(config.default_sample_freq_khz, 1000.0);
        assert_eq!(config.fft_size, 8192);
        assert_eq!(config.smooth_window, 50);
        assert_eq!(config.skip_bins, 300);
        assert_eq!(config.freq_range, [50.0, 500.0]);
        assert_eq!(config.db_range, [10.0, 70.0]);
    }

    #[test]
    fn test_partial_file_overlays_defaults() {
        let file = write_file(r#"{"fft_size": 4096}"#);
        let config = load_candidates(&[file.path().to_path_buf()]);

        assert_eq!(config.fft_size, 4096);
        assert_eq!(config.ref_gt200, 92.0);
        assert_eq!(config.smooth_window, 50);
    }

    #[test]
    fn test_full_file() {
        let file = write_file(
            r#"{
                "refGT200": 90,
                "SGT200": 60,
                "unitADC": 2.5,
                "fD_kHz": 2000,
                "fft_size": 2048,
                "smooth_window": 25,
                "skip_bins": 100,
                "freq_range": [20, 800],
                "db_range": [0, 90]
            }"#,
        );
        let config = load_candidates(&[file.path().to_path_buf()]);

        assert_eq!(config.ref_gt200, 90.0);
        assert_eq!(config.s_gt200, 60.0);
        assert_eq!(config.unit_adc, 2.5);
        assert_eq!(config.default_sample_freq_khz, 2000.0);
        assert_eq!(config.fft_size, 2048);
        assert_eq!(config.smooth_window, 25);
        assert_eq!(config.skip_bins, 100);
        assert_eq!(config.freq_range, [20.0, 800.0]);
        assert_eq!(config.db_range, [0.0, 90.0]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let file = write_file(r#"{"fft_size": 1024, "future_knob": true}"#);
        let config = load_candidates(&[file.path().to_path_buf()]);
        assert_eq!(config.fft_size, 1024);
    }

    #[test]
    fn test_malformed_file_falls_through() {
        let broken = write_file("{ not json");
        let good = write_file(r#"{"skip_bins": 42}"#);

        let config = load_candidates(&[broken.path().to_path_buf(), good.path().to_path_buf()]);
        assert_eq!(config.skip_bins, 42);
    }

    #[test]
    fn test_missing_candidates_yield_defaults() {
        let config = load_candidates(&[PathBuf::from("/nonexistent/response_config.json")]);
        assert_eq!(config, ResponseConfig::default());
    }

    #[test]
    fn test_fft_size_rounded_to_power_of_two() {
        let file = write_file(r#"{"fft_size": 5000}"#);
        let config = load_candidates(&[file.path().to_path_buf()]);
        assert_eq!(config.fft_size, 8192);
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = write_file(r#"{"fft_size": 512}"#);
        let other = write_file(r#"{"fft_size": 1024}"#);

        let config = load_candidates(&[
            explicit.path().to_path_buf(),
            other.path().to_path_buf(),
        ]);
        assert_eq!(config.fft_size, 512);
    }
}

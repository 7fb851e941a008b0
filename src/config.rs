//! Scan configuration.
//!
//! Loads settings from config.json at startup: crop fractions for the two
//! dashboard columns, the contrast factor, the recognition language, and
//! the per-call timeout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<ScanConfig> = OnceLock::new();

/// A rectangle in relative coordinates (0.0 to 1.0).
/// Used for defining crop regions that scale with the screenshot size.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RegionFraction {
    /// X position of top-left corner (0.0 = left edge, 1.0 = right edge)
    pub x: f64,
    /// Y position of top-left corner (0.0 = top edge, 1.0 = bottom edge)
    pub y: f64,
    /// Width as fraction of image width
    pub width: f64,
    /// Height as fraction of image height
    pub height: f64,
}

/// Complete scan configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Crop for the identifier column ("Premium #N" labels)
    pub identifier_region: RegionFraction,
    /// Crop for the timer column (two H:MM:SS values per row)
    pub timer_region: RegionFraction,
    /// Contrast factor applied after grayscale conversion
    pub contrast: f32,
    /// Recognition language passed to the engine
    pub language: String,
    /// Maximum time for one recognition call (milliseconds)
    pub recognition_timeout_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            // Two-column dashboard layout: identifiers in the left 55%,
            // timers in a 34%-wide column starting at 63%
            identifier_region: RegionFraction {
                x: 0.0,
                y: 0.0,
                width: 0.55,
                height: 1.0,
            },
            timer_region: RegionFraction {
                x: 0.63,
                y: 0.0,
                width: 0.34,
                height: 1.0,
            },
            contrast: 1.25,
            language: "eng".to_string(),
            recognition_timeout_ms: 30000,
        }
    }
}

impl ScanConfig {
    /// Returns human-readable problems with the configured values.
    ///
    /// Problems are warnings, not errors: region math clamps whatever it is
    /// given, and a wrong layout shows up downstream as a row-count
    /// mismatch rather than a crash.
    pub fn validation_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, frac) in [
            ("identifier_region", &self.identifier_region),
            ("timer_region", &self.timer_region),
        ] {
            if !(0.0..=1.0).contains(&frac.x) || !(0.0..=1.0).contains(&frac.y) {
                warnings.push(format!("{name}: origin outside 0.0..=1.0"));
            }
            if frac.width <= 0.0 || frac.height <= 0.0 {
                warnings.push(format!("{name}: non-positive size"));
            }
        }

        let id = &self.identifier_region;
        let timer = &self.timer_region;
        let h_overlap = id.x < timer.x + timer.width && timer.x < id.x + id.width;
        let v_overlap = id.y < timer.y + timer.height && timer.y < id.y + id.height;
        if h_overlap && v_overlap {
            warnings.push("identifier_region and timer_region overlap".to_string());
        }

        if self.contrast <= 0.0 {
            warnings.push("contrast must be positive".to_string());
        }
        if self.language.is_empty() {
            warnings.push("language must not be empty".to_string());
        }

        warnings
    }
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> ScanConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str::<ScanConfig>(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    for warning in config.validation_warnings() {
                        crate::log(&format!("Config warning: {}", warning));
                    }
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    }

    ScanConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static ScanConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        let config = ScanConfig::default();

        assert_eq!(config.identifier_region.width, 0.55);
        assert_eq!(config.timer_region.x, 0.63);
        assert!(config.validation_warnings().is_empty());
    }

    #[test]
    fn test_partial_config_fills_missing_fields_with_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"contrast": 1.5}"#).unwrap();

        assert_eq!(config.contrast, 1.5);
        assert_eq!(config.language, "eng");
        assert_eq!(config.identifier_region.width, 0.55);
        assert_eq!(config.recognition_timeout_ms, 30000);
    }

    #[test]
    fn test_overlapping_regions_warn() {
        let mut config = ScanConfig::default();
        config.timer_region.x = 0.40;

        let warnings = config.validation_warnings();

        assert!(warnings.iter().any(|w| w.contains("overlap")));
    }

    #[test]
    fn test_out_of_range_values_warn_but_load() {
        let config: ScanConfig = serde_json::from_str(
            r#"{"identifier_region": {"x": -0.2, "y": 0.0, "width": 0.5, "height": 1.0}}"#,
        )
        .unwrap();

        let warnings = config.validation_warnings();

        assert!(warnings.iter().any(|w| w.contains("identifier_region")));
    }
}

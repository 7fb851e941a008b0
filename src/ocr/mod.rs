pub mod assemble;
pub mod engine;
pub mod error;
pub mod extract;
pub mod partition;
pub mod preprocess;
pub mod report;
pub mod setup;

pub use assemble::{assemble, Diagnostics, Row, ScanOutcome};
pub use engine::{OcrEngine, TesseractEngine};
pub use error::{EngineError, RegionKind, ScanError};
pub use report::render_report;

use image::{ImageBuffer, Rgba};

use crate::config::ScanConfig;
use extract::{extract_identifiers, extract_times};
use partition::compute_regions;
use preprocess::prepare;

/// Characters the identifier column may contain. Restricting the engine to
/// these keeps it from hallucinating letters into the digits.
pub const IDENTIFIER_ALPHABET: &str = "Premium#0123456789 ";

/// Characters the timer column may contain.
pub const TIMER_ALPHABET: &str = "0123456789: ";

/// High-level pipeline: screenshot → paired rows with diagnostics.
///
/// Splits the image into the identifier and timer columns, prepares each
/// crop, recognizes each with its restricted alphabet, extracts tokens, and
/// pairs them positionally. The two regions are independent: both are
/// dispatched before either failure is surfaced, and a failure reports
/// which region it came from.
pub fn scan_image(
    engine: &dyn OcrEngine,
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    config: &ScanConfig,
) -> Result<ScanOutcome, ScanError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ScanError::EmptyRegion { width, height });
    }

    let (identifier_region, timer_region) = compute_regions(width, height, config);
    crate::log(&format!(
        "Scan regions: identifiers {:?}, timers {:?}",
        identifier_region, timer_region
    ));

    let identifier_crop = prepare(img, &identifier_region, config.contrast)?;
    let timer_crop = prepare(img, &timer_region, config.contrast)?;

    let identifier_result = engine.recognize(&identifier_crop, IDENTIFIER_ALPHABET);
    let timer_result = engine.recognize(&timer_crop, TIMER_ALPHABET);

    let identifier_text = match identifier_result {
        Ok(text) => text,
        Err(source) => {
            if let Ok(text) = &timer_result {
                crate::log(&format!(
                    "Timer region still recognized {} chars",
                    text.len()
                ));
            }
            return Err(ScanError::Recognition {
                region: RegionKind::Identifier,
                source,
            });
        }
    };
    let timer_text = timer_result.map_err(|source| ScanError::Recognition {
        region: RegionKind::Timer,
        source,
    })?;

    let identifiers = extract_identifiers(&identifier_text);
    let times = extract_times(&timer_text);
    crate::log(&format!(
        "Extracted {} identifiers, {} times",
        identifiers.len(),
        times.len()
    ));

    let outcome = assemble(&identifiers, &times);
    if outcome.diagnostics.mismatch {
        crate::log(&format!(
            "Row count mismatch: {} IDs vs {} time pairs",
            outcome.diagnostics.identifiers_found, outcome.diagnostics.pair_count
        ));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::sync::Mutex;

    /// Canned engine: answers with timer text when the alphabet is the one
    /// with a colon, identifier text otherwise. Records every call.
    struct FakeEngine {
        identifier_text: String,
        timer_text: String,
        fail_identifiers: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeEngine {
        fn new(identifier_text: &str, timer_text: &str) -> Self {
            Self {
                identifier_text: identifier_text.to_string(),
                timer_text: timer_text.to_string(),
                fail_identifiers: false,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl OcrEngine for FakeEngine {
        fn recognize(
            &self,
            _img: &ImageBuffer<Luma<u8>, Vec<u8>>,
            alphabet: &str,
        ) -> Result<String, EngineError> {
            self.calls.lock().unwrap().push(alphabet.to_string());
            if alphabet.contains(':') {
                Ok(self.timer_text.clone())
            } else if self.fail_identifiers {
                Err(EngineError::Failed {
                    message: "boom".to_string(),
                })
            } else {
                Ok(self.identifier_text.clone())
            }
        }
    }

    fn test_image() -> ImageBuffer<Rgba<u8>, Vec<u8>> {
        ImageBuffer::from_pixel(200, 100, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_scan_pairs_rows_and_flags_mismatch() {
        // Identifier pass sees 2 labels, timer pass only completes 1 pair
        let engine = FakeEngine::new(
            "Premium #11 noise Premium#3",
            "04:23:33 47:44:40 00:01:02",
        );

        let outcome = scan_image(&engine, &test_image(), &ScanConfig::default()).unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].identifier, "Premium #11");
        assert_eq!(outcome.rows[0].time_a, "04:23:33");
        assert_eq!(outcome.rows[0].time_b, "47:44:40");
        assert!(outcome.diagnostics.mismatch);
        assert_eq!(outcome.diagnostics.identifiers_found, 2);
        assert_eq!(outcome.diagnostics.pair_count, 1);
    }

    #[test]
    fn test_scan_clean_match_has_no_mismatch() {
        let engine = FakeEngine::new(
            "Premium #1\nPremium #2",
            "00:10:00 01:00:00\n02:30:00 100:00:00",
        );

        let outcome = scan_image(&engine, &test_image(), &ScanConfig::default()).unwrap();

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[1].identifier, "Premium #2");
        assert_eq!(outcome.rows[1].time_b, "100:00:00");
        assert!(!outcome.diagnostics.mismatch);
    }

    #[test]
    fn test_scan_uses_one_alphabet_per_region() {
        let engine = FakeEngine::new("Premium #1", "00:10:00 01:00:00");

        scan_image(&engine, &test_image(), &ScanConfig::default()).unwrap();

        let calls = engine.calls.lock().unwrap();
        assert_eq!(*calls, [IDENTIFIER_ALPHABET, TIMER_ALPHABET]);
    }

    #[test]
    fn test_scan_dispatches_both_regions_before_failing() {
        let mut engine = FakeEngine::new("", "04:23:33 47:44:40");
        engine.fail_identifiers = true;

        let err = scan_image(&engine, &test_image(), &ScanConfig::default()).unwrap_err();

        match err {
            ScanError::Recognition { region, .. } => assert_eq!(region, RegionKind::Identifier),
            other => panic!("unexpected error: {other}"),
        }
        // The timer region was still recognized
        assert_eq!(engine.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_scan_rejects_empty_image() {
        let engine = FakeEngine::new("", "");
        let empty: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(0, 0);

        let err = scan_image(&engine, &empty, &ScanConfig::default()).unwrap_err();

        assert!(matches!(err, ScanError::EmptyRegion { .. }));
        assert!(engine.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_scan_empty_recognition_yields_empty_outcome() {
        let engine = FakeEngine::new("", "");

        let outcome = scan_image(&engine, &test_image(), &ScanConfig::default()).unwrap();

        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.diagnostics.identifiers_found, 0);
        assert_eq!(outcome.diagnostics.times_found, 0);
        assert!(!outcome.diagnostics.mismatch);
    }
}

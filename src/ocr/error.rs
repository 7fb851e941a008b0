//! Error types for the scan pipeline.
//!
//! Setup failures, per-region recognition failures, and degenerate-region
//! validation are distinct variants so the caller can react to each.

use thiserror::Error;

/// Which of the two crop regions an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Left column with the "Premium #N" labels.
    Identifier,
    /// Right column with the H:MM:SS values.
    Timer,
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Identifier => write!(f, "identifier region"),
            RegionKind::Timer => write!(f, "timer region"),
        }
    }
}

/// Failures from a single recognition-engine call.
///
/// The engine does not know which region it was handed; the pipeline wraps
/// these into [`ScanError::Recognition`] with the region attached. Note that
/// recognizing nothing is not an error; that returns an empty string.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine ran but reported failure.
    #[error("engine invocation failed: {message}")]
    Failed { message: String },

    /// The engine did not finish within the configured time and was killed.
    #[error("recognition timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised by the scan pipeline.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The recognition engine could not be located or initialized. Fatal for
    /// the invocation; no pipeline stage runs after this.
    #[error("engine setup failed: {message}")]
    Setup { message: String },

    /// Recognition failed for one region. The other region is independent
    /// and has already been dispatched by the time this is returned.
    #[error("recognition failed for {region}: {source}")]
    Recognition {
        region: RegionKind,
        #[source]
        source: EngineError,
    },

    /// A zero-area crop reached the preprocessor.
    #[error("degenerate region: {width}x{height} has no pixels")]
    EmptyRegion { width: u32, height: u32 },
}

impl ScanError {
    /// Setup failure with the given message.
    pub fn setup(message: impl Into<String>) -> Self {
        ScanError::Setup {
            message: message.into(),
        }
    }
}

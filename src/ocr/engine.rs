use std::process::{Child, Command, Output, Stdio};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use image::{ImageBuffer, Luma};
use tempfile::NamedTempFile;

use super::error::{EngineError, ScanError};
use super::setup::{self, TesseractPaths};

/// Page segmentation mode passed to Tesseract: assume a single uniform
/// block of text, which matches one cropped dashboard column.
const PAGE_SEGMENTATION_MODE: &str = "6";

/// Poll interval while waiting for the recognition process to exit.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Boundary to the external recognition capability: hand it a prepared
/// region and the characters it may contain, get raw text back.
///
/// An empty string is a valid result ("recognized nothing"); failures come
/// back as [`EngineError`]. Implementations are shared across the process,
/// so they must be safe to call from multiple threads and serialize
/// internally if the underlying capability needs it.
pub trait OcrEngine: Send + Sync {
    fn recognize(
        &self,
        img: &ImageBuffer<Luma<u8>, Vec<u8>>,
        alphabet: &str,
    ) -> Result<String, EngineError>;
}

/// Tesseract-CLI-backed recognition engine.
///
/// Construction resolves the executable and tessdata once, which is the
/// expensive part. Each call writes the region to a temporary PNG and runs
/// one tesseract process with the alphabet as its character whitelist.
pub struct TesseractEngine {
    paths: TesseractPaths,
    language: String,
    timeout: Duration,
    // One recognition at a time on a shared instance.
    call_lock: Mutex<()>,
}

impl TesseractEngine {
    /// Resolves a usable Tesseract install for `language`.
    pub fn new(language: &str, timeout_ms: u64) -> Result<Self, ScanError> {
        let paths = setup::ensure_tesseract(language)?;
        Ok(Self {
            paths,
            language: language.to_string(),
            timeout: Duration::from_millis(timeout_ms),
            call_lock: Mutex::new(()),
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(
        &self,
        img: &ImageBuffer<Luma<u8>, Vec<u8>>,
        alphabet: &str,
    ) -> Result<String, EngineError> {
        // The engine holds no cross-call state; recover from a poisoned lock.
        let _guard = self
            .call_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let child = Command::new(&self.paths.executable)
            .arg(temp_input.path())
            .arg("stdout")
            .arg("--tessdata-dir")
            .arg(&self.paths.tessdata)
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(PAGE_SEGMENTATION_MODE)
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={alphabet}"))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let output = wait_with_timeout(child, self.timeout)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Failed {
                message: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Waits for the child to exit, killing it once `timeout` elapses.
///
/// A region crop produces far less output than the pipe buffer holds, so
/// collecting stdout and stderr after exit cannot deadlock.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<Output, EngineError> {
    let started = Instant::now();
    loop {
        if child.try_wait()?.is_some() {
            return Ok(child.wait_with_output()?);
        }
        if started.elapsed() >= timeout {
            // Kill and reap; failure here means the process already exited.
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    }
}

/// Process-wide engine instance, created on first use from the loaded
/// configuration.
///
/// A failed initialization is cached: every later call reports the same
/// setup error without retrying. Restarting the process is the way to
/// retry a fixed install.
pub fn global() -> Result<&'static TesseractEngine, ScanError> {
    static ENGINE: OnceLock<Result<TesseractEngine, String>> = OnceLock::new();

    ENGINE
        .get_or_init(|| {
            let config = crate::config::get_config();
            TesseractEngine::new(&config.language, config.recognition_timeout_ms).map_err(|e| {
                match e {
                    ScanError::Setup { message } => message,
                    other => other.to_string(),
                }
            })
        })
        .as_ref()
        .map_err(|message| ScanError::Setup {
            message: message.clone(),
        })
}

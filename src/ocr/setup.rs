use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::error::ScanError;
use crate::log;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Resolved Tesseract install used by the engine.
#[derive(Debug, Clone)]
pub struct TesseractPaths {
    pub executable: PathBuf,
    pub tessdata: PathBuf,
}

/// Ensures a usable Tesseract install for `language`: locates the
/// executable and a tessdata directory, downloading the trained-data file
/// into the local install dir when no copy exists anywhere.
pub fn ensure_tesseract(language: &str) -> Result<TesseractPaths, ScanError> {
    let executable = find_tesseract_executable()?;
    let tessdata = match find_tessdata_dir(language) {
        Ok(dir) => dir,
        Err(_) => download_tessdata(language)?,
    };

    log(&format!(
        "Tesseract ready: {} (tessdata: {})",
        executable.display(),
        tessdata.display()
    ));

    Ok(TesseractPaths {
        executable,
        tessdata,
    })
}

/// Finds the Tesseract executable, checking our local dir first, then PATH,
/// then common install locations.
pub fn find_tesseract_executable() -> Result<PathBuf, ScanError> {
    let local_exe = crate::paths::engine_dir().join(executable_name());
    if local_exe.exists() {
        return Ok(local_exe);
    }

    // Check PATH
    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for path in COMMON_EXECUTABLE_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(ScanError::setup(
        "tesseract not found. Install Tesseract-OCR (apt install tesseract-ocr, \
         brew install tesseract, or the UB-Mannheim build on Windows) and make \
         sure it is on PATH",
    ))
}

/// Finds a tessdata directory holding the trained data for `language`.
pub fn find_tessdata_dir(language: &str) -> Result<PathBuf, ScanError> {
    let file = traineddata_name(language);

    let local_tessdata = crate::paths::engine_dir().join("tessdata");
    if local_tessdata.join(&file).exists() {
        return Ok(local_tessdata);
    }

    for path in COMMON_TESSDATA_PATHS {
        let p = PathBuf::from(path);
        if p.join(&file).exists() {
            return Ok(p);
        }
    }

    // TESSDATA_PREFIX may point at the tessdata dir itself or at its parent
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        for candidate in [PathBuf::from(&prefix), PathBuf::from(&prefix).join("tessdata")] {
            if candidate.join(&file).exists() {
                return Ok(candidate);
            }
        }
    }

    Err(ScanError::setup(format!(
        "no tessdata directory with {file} found"
    )))
}

fn executable_name() -> &'static str {
    if cfg!(windows) {
        "tesseract.exe"
    } else {
        "tesseract"
    }
}

const COMMON_EXECUTABLE_PATHS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

const COMMON_TESSDATA_PATHS: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];

fn traineddata_name(language: &str) -> String {
    format!("{language}.traineddata")
}

/// Downloads `<language>.traineddata` into the local install dir and returns
/// the tessdata directory it now lives in.
fn download_tessdata(language: &str) -> Result<PathBuf, ScanError> {
    let file = traineddata_name(language);
    let tessdata_dir = crate::paths::engine_dir().join("tessdata");
    fs::create_dir_all(&tessdata_dir).map_err(|e| {
        ScanError::setup(format!("could not create {}: {}", tessdata_dir.display(), e))
    })?;

    let url = format!("{}/{}", TESSDATA_REPO, file);
    let target = tessdata_dir.join(&file);

    log(&format!("Downloading {}...", file));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .map_err(|e| ScanError::setup(format!("http client: {}", e)))?;

    let response = client
        .get(&url)
        .header("User-Agent", "timescan")
        .send()
        .map_err(|e| ScanError::setup(format!("download of {} failed: {}", file, e)))?;

    if !response.status().is_success() {
        return Err(ScanError::setup(format!(
            "failed to download {}: HTTP {}",
            file,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .map_err(|e| ScanError::setup(format!("download of {} failed: {}", file, e)))?;
    let mut out = fs::File::create(&target)
        .map_err(|e| ScanError::setup(format!("could not write {}: {}", target.display(), e)))?;
    out.write_all(&bytes)
        .map_err(|e| ScanError::setup(format!("could not write {}: {}", target.display(), e)))?;

    log(&format!("Downloaded {} ({} bytes)", file, bytes.len()));

    Ok(tessdata_dir)
}

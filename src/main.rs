//! timescan
//!
//! Extracts server rows from dashboard screenshots. Each screenshot is
//! split into an identifier column and a timer column, both are recognized
//! separately, and the tokens are paired into "Premium #N | H:MM:SS |
//! H:MM:SS" rows with count diagnostics.

mod config;
mod ocr;
mod paths;

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

/// Logs a message to both console and log file with timestamp.
///
/// Operational output goes to stderr; stdout carries only the reports.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    eprint!("{}", line);
    let log_path = paths::get_logs_dir().join("timescan.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        // Write directly; the paths module may not be usable mid-panic
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        {
            let log_path = exe_dir.join("logs").join("timescan.log");
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
                let _ = file.write_all(log_msg.as_bytes());
            }
        }
    }));

    // Ensure output directories exist
    paths::ensure_directories()?;

    // Load configuration
    config::init_config();

    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        eprintln!("Usage: timescan <screenshot>...");
        std::process::exit(2);
    }

    // Resolve the engine up front: a broken install fails once, before any
    // image is decoded.
    let engine = ocr::engine::global()?;
    let config = config::get_config();

    let mut failures = 0usize;
    let mut first = true;
    for file in &files {
        log(&format!("Scanning {}", file));
        match scan_file(engine, file, config) {
            Ok(report) => {
                if !first {
                    println!();
                }
                println!("{}", report);
                first = false;
            }
            Err(e) => {
                failures += 1;
                log(&format!("Scan failed for {}: {:#}", file, e));
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} screenshots failed", failures, files.len());
    }
    Ok(())
}

/// Decodes one screenshot and runs the scan pipeline on it.
fn scan_file(
    engine: &dyn ocr::OcrEngine,
    file: &str,
    config: &config::ScanConfig,
) -> Result<String> {
    let img = image::open(file)
        .with_context(|| format!("could not open {}", file))?
        .to_rgba8();

    let outcome = ocr::scan_image(engine, &img, config)?;
    Ok(ocr::render_report(&outcome))
}

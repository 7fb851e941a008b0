//! Region partitioning: fixed-fraction crop rectangles for the two columns.
//!
//! The identifier column and the timer column are cut from the screenshot
//! using configured fractions of the image size, so the same configuration
//! works at any resolution.

use crate::config::{RegionFraction, ScanConfig};

/// A crop rectangle in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    /// Converts a relative fraction to pixels within a `width` x `height`
    /// image.
    ///
    /// Dimensions are floored and at least 1 pixel, and the rectangle is
    /// clamped to stay inside the image, so any configuration yields a
    /// usable crop.
    pub fn from_fraction(frac: &RegionFraction, width: u32, height: u32) -> Self {
        let x = ((frac.x * width as f64) as u32).min(width.saturating_sub(1));
        let y = ((frac.y * height as f64) as u32).min(height.saturating_sub(1));
        let w = ((frac.width * width as f64) as u32).max(1).min(width - x);
        let h = ((frac.height * height as f64) as u32).max(1).min(height - y);
        Region { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Computes the identifier and timer crop regions for an image.
///
/// Pure function of the dimensions and the configured fractions. The default
/// fractions assume the two-column dashboard layout; a wrong assumption is
/// not an error here, it shows up downstream as a row-count mismatch.
pub fn compute_regions(width: u32, height: u32, config: &ScanConfig) -> (Region, Region) {
    (
        Region::from_fraction(&config.identifier_region, width, height),
        Region::from_fraction(&config.timer_region, width, height),
    )
}

use image::{ImageBuffer, Luma, Rgba};

use super::error::ScanError;
use super::partition::Region;

/// Crops a sub-region from an image using absolute pixel coordinates.
///
/// The rectangle is clamped to the image bounds, so a region produced by
/// [`Region::from_fraction`] always comes back at its stated size.
pub fn crop_region(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    region: &Region,
) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let (w, h) = img.dimensions();

    let x0 = region.x.min(w);
    let y0 = region.y.min(h);
    let rw = region.w.min(w - x0);
    let rh = region.h.min(h - y0);

    image::imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}

/// Converts an image to contrast-boosted grayscale for recognition.
///
/// Per pixel: Rec. 601 luminance (0.299 R + 0.587 G + 0.114 B), then the
/// contrast curve `(v - 128) * contrast + 128`, clamped to 0..=255. The
/// alpha channel is ignored.
///
/// Values near mid-gray move little; bright text and dark background are
/// pushed apart, which is what the recognition engine wants.
pub fn boost_contrast(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    contrast: f32,
) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let luminance =
            0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
        let boosted = ((luminance - 128.0) * contrast + 128.0).clamp(0.0, 255.0);

        output.put_pixel(x, y, Luma([boosted as u8]));
    }

    output
}

/// Prepares one region of a screenshot for recognition: crop, then
/// contrast-boosted grayscale.
///
/// Zero-area regions are rejected here, before anything reaches the engine.
pub fn prepare(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    region: &Region,
    contrast: f32,
) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, ScanError> {
    if region.is_empty() {
        return Err(ScanError::EmptyRegion {
            width: region.w,
            height: region.h,
        });
    }

    Ok(boost_contrast(&crop_region(img, region), contrast))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_region() {
        // 100x200 image with coordinates encoded in the channels
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(100, 200, |x, y| Rgba([x as u8, y as u8, 0, 255]));

        let region = Region { x: 10, y: 50, w: 50, h: 20 };
        let cropped = crop_region(&img, &region);

        assert_eq!(cropped.dimensions(), (50, 20));
        // Top-left pixel should be (10, 50) from original
        assert_eq!(cropped.get_pixel(0, 0)[0], 10);
        assert_eq!(cropped.get_pixel(0, 0)[1], 50);
    }

    #[test]
    fn test_crop_region_clamps() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(100, 100);
        let region = Region { x: 90, y: 90, w: 50, h: 50 };
        let cropped = crop_region(&img, &region);

        // Should clamp to 10x10 (remaining pixels)
        assert_eq!(cropped.dimensions(), (10, 10));
    }

    #[test]
    fn test_boost_contrast_extremes_saturate() {
        let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

        let result = boost_contrast(&img, 1.25);

        assert_eq!(result.get_pixel(0, 0)[0], 255, "White stays white");
        assert_eq!(result.get_pixel(1, 0)[0], 0, "Black stays black");
    }

    #[test]
    fn test_boost_contrast_weights_channels() {
        let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(3, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(2, 0, Rgba([0, 0, 255, 255]));

        let result = boost_contrast(&img, 1.25);

        // Luminance 76.245 / 149.685 / 29.07, boosted by 1.25 around 128
        assert_eq!(result.get_pixel(0, 0)[0], 63);
        assert_eq!(result.get_pixel(1, 0)[0], 155);
        assert_eq!(result.get_pixel(2, 0)[0], 4);
    }

    #[test]
    fn test_boost_contrast_ignores_alpha() {
        let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(2, 1);
        img.put_pixel(0, 0, Rgba([200, 200, 200, 255]));
        img.put_pixel(1, 0, Rgba([200, 200, 200, 0]));

        let result = boost_contrast(&img, 1.25);

        assert_eq!(result.get_pixel(0, 0)[0], result.get_pixel(1, 0)[0]);
    }

    #[test]
    fn test_prepare_output_matches_region_size() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(64, 32, Rgba([128, 128, 128, 255]));
        let region = Region { x: 4, y: 8, w: 20, h: 10 };

        let prepared = prepare(&img, &region, 1.25).unwrap();

        assert_eq!(prepared.dimensions(), (20, 10));
    }

    #[test]
    fn test_prepare_rejects_degenerate_region() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(10, 10);
        let region = Region { x: 0, y: 0, w: 0, h: 5 };

        let err = prepare(&img, &region, 1.25).unwrap_err();

        assert!(matches!(err, ScanError::EmptyRegion { width: 0, height: 5 }));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — downscaling, cropping, and JPEG encoding of captured
// pages. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, imageops::FilterType};
use pagekeep_core::error::PagekeepError;
use pagekeep_core::Dimensions;
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`
/// wrapping the result, enabling method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::open("capture.jpg")?
///     .downscale_to_width(800)
///     .to_jpeg_bytes(80)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, PagekeepError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            PagekeepError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Shrink the image to `max_width`, preserving aspect ratio.
    ///
    /// Images already narrower than `max_width` are returned unchanged; this
    /// never upscales. Uses a triangle filter, which is plenty for a working
    /// copy that only feeds detection.
    #[instrument(skip(self))]
    pub fn downscale_to_width(self, max_width: u32) -> Self {
        let (w, h) = (self.image.width(), self.image.height());
        if max_width == 0 || w <= max_width || h == 0 {
            return self;
        }

        let new_h = ((h as f64 * max_width as f64 / w as f64).round() as u32).max(1);
        let resized = self
            .image
            .resize_exact(max_width, new_h, FilterType::Triangle);
        debug!(
            from_w = w,
            from_h = h,
            to_w = resized.width(),
            to_h = resized.height(),
            "Downscale complete"
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, PagekeepError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|err| PagekeepError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(w: u32, h: u32) -> ImageProcessor {
        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            w,
            h,
            Rgb([200, 190, 180]),
        )))
    }

    #[test]
    fn downscale_preserves_aspect_ratio() {
        let out = solid(1600, 1200).downscale_to_width(800);
        assert_eq!(out.dimensions(), Dimensions::new(800, 600));
    }

    #[test]
    fn downscale_never_upscales() {
        let out = solid(640, 480).downscale_to_width(800);
        assert_eq!(out.dimensions(), Dimensions::new(640, 480));
    }

    #[test]
    fn jpeg_output_decodes() {
        let bytes = solid(32, 16).to_jpeg_bytes(80).expect("encode");
        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }
}

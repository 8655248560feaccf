// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalization — turn the original frame plus detected corners into a
// store-ready document image.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{CropRect, Dimensions, Point, Quadrilateral};
use tracing::{debug, info, instrument};

use super::frame::Frame;
use crate::image::processor::ImageProcessor;

/// Default JPEG quality for normalized documents.
pub const DEFAULT_QUALITY: u8 = 80;

/// Largest crop padding a pipeline accepts from configuration.
pub const MAX_PADDING: u32 = 2_000;

/// Upper bound on the pixel count of a rectified output image.
const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Output of a normalizer.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    /// The normalized image.
    pub frame: Frame,
    /// Region of the original frame the document was taken from.
    pub crop: CropRect,
    /// JPEG quality used for `encoded`.
    pub quality: u8,
    /// JPEG bytes of `frame`.
    pub encoded: Vec<u8>,
}

/// Produces a document image from the full-resolution frame and a
/// quadrilateral in that frame's coordinate space.
///
/// Fails with [`PagekeepError::ProcessingFailed`] when no usable region
/// remains. Callers then keep the unmodified original rather than aborting.
pub trait PerspectiveNormalizer: Send + Sync {
    fn normalize(
        &self,
        original: &Frame,
        quad: &Quadrilateral,
        padding: u32,
    ) -> Result<NormalizedDocument>;
}

/// Bounding box of `quad` grown by `padding` on every side and clamped to
/// `bounds`. Origins round down and far edges round up.
pub fn crop_rect_for(quad: &Quadrilateral, padding: u32, bounds: Dimensions) -> Result<CropRect> {
    let bbox = quad.bounding_box();
    let pad = padding as f64;

    let x0 = (bbox.min_x - pad).floor().max(0.0);
    let y0 = (bbox.min_y - pad).floor().max(0.0);
    let x1 = (bbox.max_x + pad).ceil().min(bounds.width as f64);
    let y1 = (bbox.max_y + pad).ceil().min(bounds.height as f64);

    if x1 <= x0 || y1 <= y0 {
        return Err(PagekeepError::ProcessingFailed(format!(
            "crop box ({x0}, {y0})-({x1}, {y1}) is empty within {}x{}",
            bounds.width, bounds.height
        )));
    }

    Ok(CropRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

fn encode(image: DynamicImage, quality: u8) -> Result<(Frame, Vec<u8>)> {
    let processor = ImageProcessor::from_dynamic(image);
    let encoded = processor
        .to_jpeg_bytes(quality)
        .map_err(|e| PagekeepError::ProcessingFailed(e.to_string()))?;
    Ok((Frame::from_image(processor.into_dynamic()), encoded))
}

// -- Bounding-box crop --------------------------------------------------------

/// Crops the original to the padded bounding box of the corners.
///
/// The corners only size the crop region. A skewed page stays skewed; use
/// [`HomographyNormalizer`] to rectify it.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBoxNormalizer {
    pub quality: u8,
}

impl Default for BoundingBoxNormalizer {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl PerspectiveNormalizer for BoundingBoxNormalizer {
    #[instrument(skip_all, fields(padding, quality = self.quality))]
    fn normalize(
        &self,
        original: &Frame,
        quad: &Quadrilateral,
        padding: u32,
    ) -> Result<NormalizedDocument> {
        let crop = crop_rect_for(quad, padding, original.dimensions())?;
        let cropped = original
            .image()
            .crop_imm(crop.x, crop.y, crop.width, crop.height);
        let (frame, encoded) = encode(cropped, self.quality)?;

        info!(?crop, bytes = encoded.len(), "Document cropped to bounding box");
        Ok(NormalizedDocument {
            frame,
            crop,
            quality: self.quality,
            encoded,
        })
    }
}

// -- Projective warp ----------------------------------------------------------

/// Warps the quadrilateral onto an upright rectangle.
///
/// The output is sized from the average lengths of opposing edges, plus
/// `padding` on every side. Padding is capped at the original's longer side,
/// and an output that would still be too large fails with
/// [`PagekeepError::ProcessingFailed`]. Pixels that fall outside the original
/// are white.
#[derive(Debug, Clone, Copy)]
pub struct HomographyNormalizer {
    pub quality: u8,
}

impl Default for HomographyNormalizer {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn padded_size(doc_w: u32, doc_h: u32, padding: u32) -> Result<(u32, u32)> {
    let grow = |side: u32| padding.checked_mul(2).and_then(|p| p.checked_add(side));
    let (Some(out_w), Some(out_h)) = (grow(doc_w), grow(doc_h)) else {
        return Err(PagekeepError::ProcessingFailed(format!(
            "padding {padding} overflows a {doc_w}x{doc_h} output"
        )));
    };
    if out_w as u64 * out_h as u64 > MAX_OUTPUT_PIXELS {
        return Err(PagekeepError::ProcessingFailed(format!(
            "rectified output {out_w}x{out_h} is too large"
        )));
    }
    Ok((out_w, out_h))
}

impl PerspectiveNormalizer for HomographyNormalizer {
    #[instrument(skip_all, fields(padding, quality = self.quality))]
    fn normalize(
        &self,
        original: &Frame,
        quad: &Quadrilateral,
        padding: u32,
    ) -> Result<NormalizedDocument> {
        let crop = crop_rect_for(quad, padding, original.dimensions())?;

        let doc_w = ((distance(quad.top_left(), quad.top_right())
            + distance(quad.bottom_left(), quad.bottom_right()))
            / 2.0)
            .round() as u32;
        let doc_h = ((distance(quad.top_left(), quad.bottom_left())
            + distance(quad.top_right(), quad.bottom_right()))
            / 2.0)
            .round() as u32;
        if doc_w == 0 || doc_h == 0 {
            return Err(PagekeepError::ProcessingFailed(format!(
                "rectified size {doc_w}x{doc_h} is empty"
            )));
        }

        let bounds = original.dimensions();
        let padding = padding.min(bounds.width.max(bounds.height));
        let (out_w, out_h) = padded_size(doc_w, doc_h, padding)?;
        let (pad, w, h) = (padding as f32, doc_w as f32, doc_h as f32);

        let src = quad.corners().map(|p| (p.x as f32, p.y as f32));
        let dest = [(pad, pad), (pad + w, pad), (pad + w, pad + h), (pad, pad + h)];

        let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
            PagekeepError::ProcessingFailed("projective transform is singular".into())
        })?;

        let rgba = original.image().to_rgba8();
        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(
            &rgba,
            &projection,
            Interpolation::Bilinear,
            Rgba([255u8, 255, 255, 255]),
            &mut output,
        );
        debug!(out_w, out_h, "Projective warp applied");

        let (frame, encoded) = encode(DynamicImage::ImageRgba8(output), self.quality)?;
        info!(out_w, out_h, bytes = encoded.len(), "Document rectified");
        Ok(NormalizedDocument {
            frame,
            crop,
            quality: self.quality,
            encoded,
        })
    }
}

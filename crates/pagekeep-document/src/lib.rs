// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagekeep-document — Image handling for captured pages.
//
// Provides an image processor (downscale, crop, JPEG encode), frame loading
// with downsampled working copies, and the scan pipeline: edge detection,
// coordinate mapping back to full resolution, and normalization.

pub mod image;
pub mod scan;

// Re-export the primary types so callers can use `pagekeep_document::ScanPipeline` etc.
pub use crate::image::processor::ImageProcessor;
pub use scan::detect::{EdgeDetector, MarginDetector};
pub use scan::frame::Frame;
pub use scan::mapper::map_to_original;
pub use scan::normalize::{
    BoundingBoxNormalizer, HomographyNormalizer, MAX_PADDING, NormalizedDocument,
    PerspectiveNormalizer,
};
pub use scan::pipeline::{ProcessedScan, ScanPipeline};

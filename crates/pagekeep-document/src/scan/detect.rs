// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document edge detection — find the four corners of a page in a frame.

use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{Point, Quadrilateral};
use tracing::{debug, instrument};

use super::frame::Frame;

/// Locates a document in a frame.
///
/// Implementations run on the downsampled working copy, never on the
/// full-resolution original. On success the quadrilateral is in the working
/// frame's coordinate space, ordered top-left, top-right, bottom-right,
/// bottom-left. Zero-area or undecodable frames fail with
/// [`PagekeepError::DetectionFailed`].
pub trait EdgeDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Quadrilateral>;
}

/// Placeholder detector: insets every corner by a fixed fraction of the frame.
///
/// This does not look at the image content at all. It assumes the user framed
/// the page roughly in the middle of the shot and trims a uniform border. Any
/// content-aware detector can replace it through [`EdgeDetector`] without
/// changes downstream.
#[derive(Debug, Clone, Copy)]
pub struct MarginDetector {
    margin: f64,
}

impl MarginDetector {
    pub const DEFAULT_MARGIN: f64 = 0.1;

    /// `margin` must lie strictly between 0 and 0.5.
    pub fn new(margin: f64) -> Result<Self> {
        if margin.is_finite() && margin > 0.0 && margin < 0.5 {
            Ok(Self { margin })
        } else {
            Err(PagekeepError::DetectionFailed(format!(
                "margin {margin} must be between 0 and 0.5"
            )))
        }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }
}

impl Default for MarginDetector {
    fn default() -> Self {
        Self {
            margin: Self::DEFAULT_MARGIN,
        }
    }
}

impl EdgeDetector for MarginDetector {
    #[instrument(skip_all, fields(margin = self.margin))]
    fn detect(&self, frame: &Frame) -> Result<Quadrilateral> {
        let dims = frame.dimensions();
        if dims.is_empty() {
            return Err(PagekeepError::DetectionFailed(format!(
                "frame has zero area ({}x{})",
                dims.width, dims.height
            )));
        }

        let (w, h) = (dims.width as f64, dims.height as f64);
        let (near_x, far_x) = (w * self.margin, w * (1.0 - self.margin));
        let (near_y, far_y) = (h * self.margin, h * (1.0 - self.margin));

        let quad = Quadrilateral::new([
            Point::new(near_x, near_y),
            Point::new(far_x, near_y),
            Point::new(far_x, far_y),
            Point::new(near_x, far_y),
        ])
        .ok_or_else(|| PagekeepError::DetectionFailed("degenerate quadrilateral".into()))?;

        debug!(corners = ?quad.corners(), "Document corners placed");
        Ok(quad)
    }
}

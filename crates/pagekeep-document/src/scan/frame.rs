// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frames — a decoded capture plus where it came from.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pagekeep_core::Dimensions;
use pagekeep_core::error::Result;
use tracing::instrument;

use crate::image::processor::ImageProcessor;

/// A decoded image and, if it was read from disk, its location.
///
/// Each capture yields two frames: the full-resolution original and a
/// downsampled working copy used only for detection. Coordinates computed on
/// one are never valid on the other without going through
/// [`ScaleFactors`](pagekeep_core::ScaleFactors).
#[derive(Clone)]
pub struct Frame {
    image: DynamicImage,
    location: Option<PathBuf>,
}

impl Frame {
    /// Decode the image at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = ImageProcessor::open(path.as_ref())?.into_dynamic();
        Ok(Self {
            image,
            location: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Wrap an in-memory image that has no backing file.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            location: None,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Downsampled copy no wider than `max_width`, for detection.
    pub fn working_copy(&self, max_width: u32) -> Frame {
        let image = ImageProcessor::from_dynamic(self.image.clone())
            .downscale_to_width(max_width)
            .into_dynamic();
        Frame::from_image(image)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("dimensions", &self.dimensions())
            .field("location", &self.location)
            .finish()
    }
}

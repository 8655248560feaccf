// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Which normalizer turns a detected quadrilateral into a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizerKind {
    /// Crop to the padded bounding box of the corners. Skew is not corrected.
    BoundingBox,
    /// Projective warp of the corners onto an upright rectangle.
    Homography,
}

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Width of the downsampled working copy used for detection.
    pub working_width: u32,
    /// Fraction of width/height the margin detector insets each corner by.
    pub detection_margin: f64,
    /// Pixels of padding added around the detected document when cropping.
    pub crop_padding: u32,
    /// JPEG quality (1-100) for normalized documents.
    pub jpeg_quality: u8,
    /// Name of the store directory inside the data directory.
    pub store_dir_name: String,
    /// Extension given to committed documents.
    pub file_extension: String,
    /// Normalizer variant.
    pub normalizer: NormalizerKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            working_width: 800,
            detection_margin: 0.1,
            crop_padding: 10,
            jpeg_quality: 80,
            store_dir_name: "scans".into(),
            file_extension: "jpg".into(),
            normalizer: NormalizerKind::BoundingBox,
        }
    }
}

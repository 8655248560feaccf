// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline — raw capture in, store-ready image out.
//
//   original frame ──downsample──▶ working copy ──detect──▶ quad (working)
//         │                                                    │ map
//         └──────────────── normalize ◀──── quad (original) ◀──┘
//
// Failures in detect/map/normalize never block the user: the pipeline falls
// back to the untouched capture and says why.

use std::path::{Path, PathBuf};

use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{AppConfig, CropRect, Dimensions, NormalizerKind, ScaleFactors};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::detect::{EdgeDetector, MarginDetector};
use super::frame::Frame;
use super::mapper::map_to_original;
use super::normalize::{
    BoundingBoxNormalizer, HomographyNormalizer, MAX_PADDING, NormalizedDocument,
    PerspectiveNormalizer,
};

/// Result of running one capture through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedScan {
    /// The capture this result was produced from.
    pub raw_location: PathBuf,
    /// The image to show for confirmation and to commit.
    pub location: PathBuf,
    /// Size of the image at `location`, when it could be decoded.
    pub dimensions: Option<Dimensions>,
    /// Region of the original the document was taken from.
    pub crop: Option<CropRect>,
    /// Why the original was kept instead of a normalized image.
    pub fallback: Option<String>,
}

impl ProcessedScan {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Detect, map, and normalize captured pages.
pub struct ScanPipeline {
    detector: Box<dyn EdgeDetector>,
    normalizer: Box<dyn PerspectiveNormalizer>,
    working_width: u32,
    padding: u32,
    transient_dir: PathBuf,
}

impl ScanPipeline {
    /// Pipeline with the given detector and normalizer and default sizing
    /// (800 px working width, 10 px padding). Normalized images are written
    /// to `transient_dir`.
    pub fn new(
        detector: Box<dyn EdgeDetector>,
        normalizer: Box<dyn PerspectiveNormalizer>,
        transient_dir: impl Into<PathBuf>,
    ) -> Self {
        let defaults = AppConfig::default();
        Self {
            detector,
            normalizer,
            working_width: defaults.working_width,
            padding: defaults.crop_padding,
            transient_dir: transient_dir.into(),
        }
    }

    /// Build the pipeline described by `config`.
    ///
    /// Rejects a margin outside (0, 0.5) and crop padding above
    /// [`MAX_PADDING`].
    pub fn from_config(config: &AppConfig, transient_dir: impl Into<PathBuf>) -> Result<Self> {
        if config.crop_padding > MAX_PADDING {
            return Err(PagekeepError::ProcessingFailed(format!(
                "crop padding {} exceeds {MAX_PADDING} px",
                config.crop_padding
            )));
        }
        let detector = MarginDetector::new(config.detection_margin)?;
        let normalizer: Box<dyn PerspectiveNormalizer> = match config.normalizer {
            NormalizerKind::BoundingBox => Box::new(BoundingBoxNormalizer {
                quality: config.jpeg_quality,
            }),
            NormalizerKind::Homography => Box::new(HomographyNormalizer {
                quality: config.jpeg_quality,
            }),
        };
        Ok(Self::new(Box::new(detector), normalizer, transient_dir)
            .with_working_width(config.working_width)
            .with_padding(config.crop_padding))
    }

    pub fn with_working_width(mut self, working_width: u32) -> Self {
        self.working_width = working_width;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn transient_dir(&self) -> &Path {
        &self.transient_dir
    }

    /// Run one capture through the pipeline.
    ///
    /// Only a capture that cannot be read at all is an error. Everything else
    /// either yields a normalized image in the transient directory or falls
    /// back to `raw` itself.
    #[instrument(skip(self), fields(raw = %raw.display()))]
    pub fn process(&self, raw: &Path) -> Result<ProcessedScan> {
        std::fs::metadata(raw)?;

        let (document, original_dims) = match self.normalize_capture(raw) {
            Ok(pair) => pair,
            Err((err, dims)) => return Ok(self.fallback(raw, dims, err)),
        };

        let location = self.transient_dir.join(format!("{}.jpg", Uuid::new_v4()));
        let written = std::fs::create_dir_all(&self.transient_dir)
            .and_then(|_| std::fs::write(&location, &document.encoded));
        if let Err(e) = written {
            return Ok(self.fallback(raw, Some(original_dims), PagekeepError::Io(e)));
        }

        info!(
            location = %location.display(),
            crop = ?document.crop,
            "Capture normalized"
        );
        Ok(ProcessedScan {
            raw_location: raw.to_path_buf(),
            location,
            dimensions: Some(document.frame.dimensions()),
            crop: Some(document.crop),
            fallback: None,
        })
    }

    /// Detect on the working copy, map to the original, normalize.
    ///
    /// On error, also returns the original's dimensions if it decoded.
    fn normalize_capture(
        &self,
        raw: &Path,
    ) -> std::result::Result<(NormalizedDocument, Dimensions), (PagekeepError, Option<Dimensions>)>
    {
        let original = Frame::open(raw)
            .map_err(|e| (PagekeepError::DetectionFailed(e.to_string()), None))?;
        let dims = original.dimensions();
        let with_dims = |e: PagekeepError| (e, Some(dims));

        let working = original.working_copy(self.working_width);
        let quad = self.detector.detect(&working).map_err(with_dims)?;
        let scale = ScaleFactors::between(dims, working.dimensions()).map_err(with_dims)?;
        let mapped = map_to_original(&quad, scale, dims).map_err(with_dims)?;
        let document = self
            .normalizer
            .normalize(&original, &mapped, self.padding)
            .map_err(with_dims)?;

        Ok((document, dims))
    }

    fn fallback(&self, raw: &Path, dims: Option<Dimensions>, err: PagekeepError) -> ProcessedScan {
        warn!(error = %err, "Normalization failed; keeping the original capture");
        ProcessedScan {
            raw_location: raw.to_path_buf(),
            location: raw.to_path_buf(),
            dimensions: dims,
            crop: None,
            fallback: Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pagekeep_core::Quadrilateral;

    fn write_capture(dir: &Path, w: u32, h: u32) -> PathBuf {
        let path = dir.join("capture.png");
        RgbImage::from_pixel(w, h, Rgb([250, 250, 245]))
            .save(&path)
            .unwrap();
        path
    }

    fn pipeline(transient: &Path) -> ScanPipeline {
        ScanPipeline::from_config(&AppConfig::default(), transient).unwrap()
    }

    #[test]
    fn full_resolution_crop_from_working_copy() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_capture(dir.path(), 1600, 1200);

        let scan = pipeline(&dir.path().join("tmp")).process(&raw).unwrap();
        assert!(!scan.is_fallback(), "{:?}", scan.fallback);
        // Working copy is 800x600, scale (2, 2): corners (160,120)-(1440,1080).
        assert_eq!(
            scan.crop,
            Some(CropRect {
                x: 150,
                y: 110,
                width: 1300,
                height: 980
            })
        );
        assert_eq!(scan.dimensions, Some(Dimensions::new(1300, 980)));
        assert!(scan.location.starts_with(dir.path().join("tmp")));
        assert!(scan.location.exists());
        assert!(raw.exists(), "the capture itself is left in place");
    }

    #[test]
    fn undecodable_capture_falls_back_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("capture.jpg");
        std::fs::write(&raw, b"definitely not a jpeg").unwrap();

        let scan = pipeline(dir.path()).process(&raw).unwrap();
        assert!(scan.is_fallback());
        assert_eq!(scan.location, raw);
        assert_eq!(scan.dimensions, None);
        assert!(scan.fallback.unwrap().contains("detection failed"));
    }

    #[test]
    fn excessive_padding_is_rejected_by_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            crop_padding: 50_000,
            ..AppConfig::default()
        };
        assert!(matches!(
            ScanPipeline::from_config(&config, dir.path()),
            Err(PagekeepError::ProcessingFailed(_))
        ));

        let at_limit = AppConfig {
            crop_padding: MAX_PADDING,
            ..AppConfig::default()
        };
        assert!(ScanPipeline::from_config(&at_limit, dir.path()).is_ok());
    }

    #[test]
    fn homography_with_huge_padding_still_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_capture(dir.path(), 160, 120);

        let scan = ScanPipeline::new(
            Box::new(MarginDetector::default()),
            Box::new(HomographyNormalizer::default()),
            dir.path().join("tmp"),
        )
        .with_padding(u32::MAX)
        .process(&raw)
        .unwrap();
        assert!(!scan.is_fallback(), "{:?}", scan.fallback);
        assert!(scan.location.exists());
    }

    #[test]
    fn missing_capture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            pipeline(dir.path())
                .process(&dir.path().join("gone.jpg"))
                .is_err()
        );
    }

    struct OffFrameDetector;

    impl EdgeDetector for OffFrameDetector {
        fn detect(&self, frame: &Frame) -> Result<Quadrilateral> {
            let d = frame.dimensions();
            Quadrilateral::from_rect(d.width as f64 * 3.0, 0.0, 10.0, 10.0)
                .ok_or_else(|| PagekeepError::DetectionFailed("bad test quad".into()))
        }
    }

    #[test]
    fn failed_mapping_falls_back_with_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_capture(dir.path(), 64, 48);

        let scan = ScanPipeline::new(
            Box::new(OffFrameDetector),
            Box::new(BoundingBoxNormalizer::default()),
            dir.path(),
        )
        .process(&raw)
        .unwrap();
        assert!(scan.is_fallback());
        assert_eq!(scan.location, raw);
        assert_eq!(scan.dimensions, Some(Dimensions::new(64, 48)));
    }

    #[test]
    fn homography_config_produces_rectified_output() {
        let dir = tempfile::tempdir().unwrap();
        let raw = write_capture(dir.path(), 400, 300);
        let config = AppConfig {
            normalizer: NormalizerKind::Homography,
            crop_padding: 0,
            ..AppConfig::default()
        };

        let scan = ScanPipeline::from_config(&config, dir.path().join("tmp"))
            .unwrap()
            .process(&raw)
            .unwrap();
        assert!(!scan.is_fallback());
        assert_eq!(scan.dimensions, Some(Dimensions::new(320, 240)));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — frames, document edge detection, mapping detected
// corners back to the original resolution, and normalization.

pub mod detect;
pub mod frame;
pub mod mapper;
pub mod normalize;
pub mod pipeline;

pub use detect::{EdgeDetector, MarginDetector};
pub use frame::Frame;
pub use normalize::{BoundingBoxNormalizer, HomographyNormalizer, PerspectiveNormalizer};
pub use pipeline::{ProcessedScan, ScanPipeline};

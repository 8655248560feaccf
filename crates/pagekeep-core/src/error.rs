// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagekeep.

use thiserror::Error;

/// Top-level error type for all Pagekeep operations.
#[derive(Debug, Error)]
pub enum PagekeepError {
    // -- Scan pipeline --
    #[error("document detection failed: {0}")]
    DetectionFailed(String),

    #[error("invalid scale factors ({scale_x}, {scale_y})")]
    InvalidScale { scale_x: f64, scale_y: f64 },

    #[error("document processing failed: {0}")]
    ProcessingFailed(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Document store --
    #[error("invalid document title {0:?}")]
    InvalidTitle(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("delete failed: {0}")]
    DeleteFailed(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("camera capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("platform bridge error: {0}")]
    Bridge(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagekeepError>;

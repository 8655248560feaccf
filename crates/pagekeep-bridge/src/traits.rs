// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use std::path::PathBuf;

use pagekeep_core::error::Result;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: NativeCamera {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// Capture a photograph of a page.
pub trait NativeCamera: Send + Sync {
    /// Take one picture and return where the raw capture was written.
    ///
    /// Returns `Ok(None)` if the user cancelled, and
    /// `PagekeepError::CaptureUnavailable` if this device cannot capture.
    fn capture_image(&self) -> Result<Option<PathBuf>>;
}

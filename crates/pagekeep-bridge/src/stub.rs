// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds where no native camera is wired up.

use std::path::PathBuf;

use pagekeep_core::error::{PagekeepError, Result};

use crate::traits::*;

/// Bridge returned where no native implementation exists.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeCamera for StubBridge {
    fn capture_image(&self) -> Result<Option<PathBuf>> {
        tracing::warn!("NativeCamera::capture_image called on stub bridge");
        Err(PagekeepError::CaptureUnavailable(
            "no camera on this platform".into(),
        ))
    }
}

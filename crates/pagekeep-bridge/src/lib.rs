// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagekeep-bridge — Native capture capabilities.
//
// The service layer receives a camera as a value and passes it on; nothing
// here is a process-wide handle. Platforms without a native implementation
// get the stub, which refuses every capture.

use std::sync::Arc;

pub mod stub;
pub mod traits;

pub use traits::{NativeCamera, PlatformBridge};

/// The bridge for the platform this binary was built for.
pub fn platform_bridge() -> Arc<dyn PlatformBridge> {
    Arc::new(stub::StubBridge)
}

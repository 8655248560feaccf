// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use pagekeep_core::AppConfig;

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application settings as edited on the settings page.
    pub config: AppConfig,
    /// One-off message shown above the document list (e.g. after saving).
    pub flash: Option<String>,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            config: svc.config(),
            flash: None,
        }
    }
}

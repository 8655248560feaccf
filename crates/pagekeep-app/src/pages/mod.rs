// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod details;
pub mod docs;
pub mod name_scan;
pub mod scan;
pub mod settings;

use dioxus::prelude::*;
use pagekeep_core::PagekeepError;
use pagekeep_core::human_errors::humanize_error;

/// Plain-language error box. Renders nothing for silent errors.
#[component]
pub fn ErrorNotice(message: String, suggestion: String) -> Element {
    rsx! {
        div { style: "padding: 12px; margin: 12px 0; border-radius: 8px; background: #f8d7da; color: #721c24;",
            strong { "{message}" }
            p { style: "margin: 4px 0 0 0; font-size: 14px;", "{suggestion}" }
        }
    }
}

/// Log `err` and turn it into props for [`ErrorNotice`], or `None` if the
/// user should not see it.
pub fn visible_error(err: &PagekeepError) -> Option<(String, String)> {
    let human = humanize_error(err);
    if human.is_visible() {
        tracing::warn!(error = %err, "operation failed");
        Some((human.message, human.suggestion))
    } else {
        tracing::debug!(error = %err, "silent failure");
        None
    }
}

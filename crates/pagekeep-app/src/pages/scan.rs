// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan page — capture a page, preview the normalized result, then confirm or
// retake.
//
// On desktop, the "capture" button opens a file dialog for image selection.
// On mobile, it uses the native camera bridge (pagekeep-bridge).

use dioxus::prelude::*;

use pagekeep_document::ProcessedScan;

use crate::Route;
use crate::pages::{ErrorNotice, visible_error};
use crate::services::app_services::AppServices;

#[component]
pub fn Scan() -> Element {
    let svc = use_context::<AppServices>();
    let navigator = use_navigator();
    let mut preview = use_signal(|| Option::<(u64, ProcessedScan)>::None);
    let mut processing = use_signal(|| false);
    let mut error = use_signal(|| Option::<(String, String)>::None);

    rsx! {
        div {
            h1 { "Scan" }
            p { style: "color: #666;", "Photograph a page. We'll trim it and keep it with your documents." }

            // Capture button
            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                disabled: *processing.read(),
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        error.set(None);
                        let raw = match svc.capture() {
                            Ok(Some(raw)) => raw,
                            Ok(None) => return,
                            Err(e) => {
                                error.set(visible_error(&e));
                                return;
                            }
                        };

                        // A new capture replaces whatever was being previewed.
                        preview.set(None);
                        processing.set(true);
                        let svc = svc.clone();
                        spawn(async move {
                            match svc.process_capture(raw).await {
                                Ok(Some(ready)) => preview.set(Some(ready)),
                                Ok(None) => {}
                                Err(e) => error.set(visible_error(&e)),
                            }
                            processing.set(false);
                        });
                    }
                },
                if preview.read().is_some() { "\u{1F4F7} Take Another" } else { "\u{1F4F7} Capture Page" }
            }

            if *processing.read() {
                p { style: "text-align: center; color: #666; margin: 24px 0;",
                    "Finding the page edges..."
                }
            }

            if let Some((message, suggestion)) = error.read().clone() {
                ErrorNotice { message, suggestion }
            }

            if let Some((ticket, scan)) = preview.read().clone() {
                {
                    let src = scan.location.display().to_string();
                    let size = scan
                        .dimensions
                        .map(|d| format!("{} x {} px", d.width, d.height))
                        .unwrap_or_default();
                    rsx! {
                        div { style: "margin: 16px 0; text-align: center;",
                            img {
                                src: "{src}",
                                style: "max-width: 100%; max-height: 50vh; border: 1px solid #ccc; border-radius: 4px;",
                            }
                            p { style: "color: #888; font-size: 13px;", "{size}" }
                            if scan.is_fallback() {
                                p { style: "color: #856404; background: #fff3cd; padding: 8px; border-radius: 6px; font-size: 14px;",
                                    "We couldn't trim this photo, so the whole picture will be kept."
                                }
                            }
                        }

                        div { style: "display: flex; gap: 8px; margin-top: 16px;",
                            button {
                                style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                                onclick: {
                                    let svc = svc.clone();
                                    move |_| {
                                        svc.retake();
                                        preview.set(None);
                                        error.set(None);
                                    }
                                },
                                "Retake"
                            }
                            button {
                                style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                                onclick: move |_| {
                                    navigator.push(Route::NameScan { ticket });
                                },
                                "Use This Scan"
                            }
                        }
                    }
                }
            } else if !*processing.read() {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "No page captured yet."
                }
            }
        }
    }
}

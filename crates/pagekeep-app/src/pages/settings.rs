// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use dioxus::prelude::*;

use pagekeep_core::NormalizerKind;
use pagekeep_document::MAX_PADDING;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<(bool, String)>::None);
    let store_dir = svc.store_dir().display().to_string();
    let version = env!("CARGO_PKG_VERSION");

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Scanning" }
                NumberRow {
                    label: "Detection width (px)",
                    value: state.read().config.working_width.to_string(),
                    on_change: move |v: String| {
                        if let Ok(width) = v.parse::<u32>()
                            && width > 0
                        {
                            state.write().config.working_width = width;
                        }
                    },
                }
                NumberRow {
                    label: "Edge margin (0 to 0.5)",
                    value: state.read().config.detection_margin.to_string(),
                    on_change: move |v: String| {
                        if let Ok(margin) = v.parse::<f64>() {
                            state.write().config.detection_margin = margin;
                        }
                    },
                }
                NumberRow {
                    label: "Crop padding (px)",
                    value: state.read().config.crop_padding.to_string(),
                    on_change: move |v: String| {
                        if let Ok(padding) = v.parse::<u32>()
                            && padding <= MAX_PADDING
                        {
                            state.write().config.crop_padding = padding;
                        }
                    },
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Straighten pages" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: normalizer_label(state.read().config.normalizer),
                        onchange: move |evt| {
                            if let Some(kind) = normalizer_from_label(&evt.value()) {
                                state.write().config.normalizer = kind;
                            }
                        },
                        option { value: "crop", "Crop only" }
                        option { value: "warp", "Crop and straighten" }
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Storage" }
                NumberRow {
                    label: "JPEG quality (1-100)",
                    value: state.read().config.jpeg_quality.to_string(),
                    on_change: move |v: String| {
                        if let Ok(quality) = v.parse::<u8>()
                            && (1..=100).contains(&quality)
                        {
                            state.write().config.jpeg_quality = quality;
                        }
                    },
                }
                p { style: "color: #999; font-size: 12px; word-break: break-all;",
                    "Documents are kept in {store_dir}"
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                save_msg.set(Some((true, "Settings saved.".into())));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some((false, format!("Save failed: {e}"))));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some((ok, ref msg)) = *save_msg.read() {
                p { style: "color: {save_colour(ok)}; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Pagekeep v{version}"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn NumberRow(label: &'static str, value: String, on_change: EventHandler<String>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "number",
                style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                value: "{value}",
                onchange: move |evt| on_change.call(evt.value()),
            }
        }
    }
}

fn save_colour(ok: bool) -> &'static str {
    if ok { "#34c759" } else { "#ff3b30" }
}

fn normalizer_label(kind: NormalizerKind) -> &'static str {
    match kind {
        NormalizerKind::BoundingBox => "crop",
        NormalizerKind::Homography => "warp",
    }
}

fn normalizer_from_label(label: &str) -> Option<NormalizerKind> {
    match label {
        "crop" => Some(NormalizerKind::BoundingBox),
        "warp" => Some(NormalizerKind::Homography),
        _ => None,
    }
}

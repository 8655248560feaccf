// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Naming step — give a confirmed capture a title and store it.

use dioxus::prelude::*;

use crate::Route;
use crate::pages::{ErrorNotice, visible_error};
use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn NameScan(ticket: u64) -> Element {
    let svc = use_context::<AppServices>();
    let mut state = use_context::<Signal<AppState>>();
    let navigator = use_navigator();
    let mut title = use_signal(String::new);
    let mut error = use_signal(|| Option::<(String, String)>::None);
    let mut saving = use_signal(|| false);

    let Some(scan) = svc.pending_scan(ticket) else {
        return rsx! {
            div {
                h1 { "Name Document" }
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "This capture is no longer available."
                }
                Link { to: Route::Scan {}, "Capture a new page" }
            }
        };
    };
    let src = scan.location.display().to_string();

    rsx! {
        div {
            h1 { "Name Document" }

            img {
                src: "{src}",
                style: "display: block; margin: 0 auto 16px; max-width: 100%; max-height: 30vh; border: 1px solid #ccc; border-radius: 4px;",
            }

            input {
                r#type: "text",
                placeholder: "e.g. Electricity bill March",
                style: "width: 100%; padding: 12px; border: 1px solid #ccc; border-radius: 8px; font-size: 16px; box-sizing: border-box;",
                value: "{title}",
                autofocus: true,
                oninput: move |evt| title.set(evt.value()),
            }

            if let Some((message, suggestion)) = error.read().clone() {
                ErrorNotice { message, suggestion }
            }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 16px;",
                disabled: *saving.read() || title.read().trim().is_empty(),
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        saving.set(true);
                        let entered = title.read().clone();
                        match svc.commit_scan(ticket, &entered) {
                            Ok(record) => {
                                tracing::info!(id = %record.id, "document saved");
                                state.write().flash = Some(format!("Saved \u{201c}{}\u{201d}.", record.title));
                                navigator.replace(Route::Docs {});
                            }
                            Err(e) => {
                                // Stay here; the capture is still pending.
                                error.set(visible_error(&e));
                            }
                        }
                        saving.set(false);
                    }
                },
                "Save"
            }

            button {
                style: "width: 100%; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 14px; margin-top: 8px;",
                onclick: move |_| {
                    navigator.push(Route::Scan {});
                },
                "Back"
            }
        }
    }
}

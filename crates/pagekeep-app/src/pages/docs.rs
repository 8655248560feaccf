// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Documents page — search stored documents, open or delete them.
//
// The list reloads when the page mounts, when the query changes, and whenever
// the service layer announces a commit or delete.

use dioxus::prelude::*;

use pagekeep_store::PendingDelete;

use crate::Route;
use crate::pages::{ErrorNotice, visible_error};
use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Docs() -> Element {
    let svc = use_context::<AppServices>();
    let mut state = use_context::<Signal<AppState>>();
    let mut query = use_signal(String::new);
    let mut generation = use_signal(|| 0u64);
    let mut pending = use_signal(|| Option::<PendingDelete>::None);
    let mut error = use_signal(|| Option::<(String, String)>::None);

    // Store change events
    let svc_events = svc.clone();
    use_future(move || {
        let mut events = svc_events.subscribe_refresh();
        async move {
            while events.changed().await.is_ok() {
                let current = *events.borrow_and_update();
                generation.set(current);
            }
        }
    });

    let svc_load = svc.clone();
    let documents = use_resource(move || {
        let svc = svc_load.clone();
        let q = query.read().clone();
        let _ = generation.read();
        async move { svc.documents(&q) }
    });

    let flash = state.read().flash.clone();

    rsx! {
        div {
            h1 { "Documents" }

            if let Some(msg) = flash {
                div { style: "padding: 8px 12px; margin-bottom: 12px; border-radius: 8px; background: #d4edda; color: #155724; display: flex; justify-content: space-between;",
                    span { "{msg}" }
                    button {
                        style: "border: none; background: none; color: #155724; cursor: pointer;",
                        onclick: move |_| state.write().flash = None,
                        "\u{2715}"
                    }
                }
            }

            input {
                r#type: "search",
                placeholder: "Search by title",
                style: "width: 100%; padding: 10px 12px; border: 1px solid #ccc; border-radius: 8px; font-size: 15px; box-sizing: border-box;",
                value: "{query}",
                oninput: move |evt| query.set(evt.value()),
            }

            if let Some((message, suggestion)) = error.read().clone() {
                ErrorNotice { message, suggestion }
            }

            match &*documents.read() {
                None => rsx! {
                    p { style: "text-align: center; color: #aaa; margin: 48px 0;", "Loading..." }
                },
                Some(Err(e)) => {
                    let (message, suggestion) = visible_error(e).unwrap_or_default();
                    rsx! { ErrorNotice { message, suggestion } }
                },
                Some(Ok(docs)) if docs.is_empty() => rsx! {
                    p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                        if query.read().trim().is_empty() { "No documents yet." } else { "Nothing matches that search." }
                    }
                },
                Some(Ok(docs)) => rsx! {
                    for doc in docs.iter() {
                        {
                            let id = doc.id.clone();
                            let confirming = pending.read().as_ref().is_some_and(|p| p.id() == id);
                            let row_style = if confirming {
                                "padding: 12px; margin: 8px 0; border: 2px solid #ff3b30; border-radius: 8px; background: #fff5f5;"
                            } else {
                                "padding: 12px; margin: 8px 0; border: 1px solid #e0e0e0; border-radius: 8px;"
                            };

                            rsx! {
                                div { key: "{id}", style: "{row_style}",
                                    div { style: "display: flex; justify-content: space-between; align-items: center;",
                                        Link { to: Route::Details { id: id.clone() },
                                            style: "text-decoration: none; color: #333;",
                                            strong { "{doc.title}" }
                                        }
                                        span { style: "color: #666; font-size: 14px;", "{doc.date}" }
                                    }

                                    div { style: "display: flex; gap: 8px; margin-top: 8px;",
                                        if confirming {
                                            span { style: "flex: 1; color: #ff3b30; font-size: 13px; align-self: center;",
                                                "Delete this document?"
                                            }
                                            button {
                                                style: "padding: 4px 12px; border-radius: 4px; border: none; color: white; background: #ff3b30; font-size: 12px;",
                                                onclick: {
                                                    let svc = svc.clone();
                                                    move |_| {
                                                        let Some(request) = pending.write().take() else { return };
                                                        if let Err(e) = svc.delete(request.confirm()) {
                                                            error.set(visible_error(&e));
                                                        }
                                                    }
                                                },
                                                "Delete"
                                            }
                                            button {
                                                style: "padding: 4px 12px; border-radius: 4px; border: 1px solid #ccc; color: #666; background: white; font-size: 12px;",
                                                onclick: move |_| pending.set(None),
                                                "Keep"
                                            }
                                        } else {
                                            button {
                                                style: "padding: 4px 12px; border-radius: 4px; border: 1px solid #ff3b30; color: #ff3b30; background: white; font-size: 12px;",
                                                onclick: {
                                                    let svc = svc.clone();
                                                    let id = id.clone();
                                                    move |_| {
                                                        error.set(None);
                                                        match svc.request_delete(&id) {
                                                            Ok(request) => pending.set(Some(request)),
                                                            Err(e) => error.set(visible_error(&e)),
                                                        }
                                                    }
                                                },
                                                "Delete\u{2026}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document details — the stored image with its title and date.

use dioxus::prelude::*;

use crate::Route;
use crate::pages::{ErrorNotice, visible_error};
use crate::services::app_services::AppServices;

#[component]
pub fn Details(id: String) -> Element {
    let svc = use_context::<AppServices>();

    let record = match svc.document(&id) {
        Ok(record) => record,
        Err(e) => {
            let (message, suggestion) = visible_error(&e).unwrap_or_default();
            return rsx! { ErrorNotice { message, suggestion } };
        }
    };

    rsx! {
        div {
            Link { to: Route::Docs {},
                style: "color: #007aff; text-decoration: none; font-size: 14px;",
                "\u{2039} Documents"
            }

            if let Some(doc) = record {
                {
                    let src = doc.location.display().to_string();
                    rsx! {
                        h1 { "{doc.title}" }
                        p { style: "color: #666; margin-top: -8px;", "{doc.date}" }
                        img {
                            src: "{src}",
                            style: "max-width: 100%; border: 1px solid #ccc; border-radius: 4px;",
                        }
                        p { style: "color: #999; font-size: 12px; word-break: break-all;", "{src}" }
                    }
                }
            } else {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "This document has been deleted."
                }
            }
        }
    }
}

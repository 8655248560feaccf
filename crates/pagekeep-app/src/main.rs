// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagekeep — photograph a page, keep it in a searchable local store.
//
// Entry point. Initialises logging, backend services, app state, and launches
// the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::details::Details;
use pages::docs::Docs;
use pages::name_scan::NameScan;
use pages::scan::Scan;
use pages::settings::Settings;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Pagekeep starting");

    let svc = match AppServices::init() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "could not initialise app services");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::new().with_context(svc).launch(app);
}

/// Top-level route enum.
///
/// Pages hand work to each other only through route parameters: a capture
/// ticket for the naming step, a document id for the details page.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Scan {},
    #[route("/name/:ticket")]
    NameScan { ticket: u64 },
    #[route("/docs")]
    Docs {},
    #[route("/docs/:id")]
    Details { id: String },
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_context::<AppServices>();
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent bottom tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            // Page content
            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }

            // Bottom tab bar
            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; padding: 8px 0; border-top: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Scan {}, label: "Scan", icon: "S" }
                TabButton { to: Route::Docs {}, label: "Documents", icon: "D" }
                TabButton { to: Route::Settings {}, label: "Settings", icon: "\u{2699}" }
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}

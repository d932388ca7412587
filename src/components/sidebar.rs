//! Sidebar Component
//!
//! Page navigation, the signed-in user and logout.

use leptos::prelude::*;
use rolling_logger::LogHandle;
use study_sync::Route;

use crate::context::use_app_context;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();
    let (collapsed, set_collapsed) = signal(false);

    let display_name = move || {
        store
            .user()
            .read()
            .as_ref()
            .map(|u| u.display_name().to_string())
            .unwrap_or_default()
    };

    view! {
        <aside class=move || if collapsed.get() { "sidebar collapsed" } else { "sidebar" }>
            <div class="sidebar-header">
                <h2 class="sidebar-title">"Study Dashboard"</h2>
                <button class="sidebar-toggle" on:click=move |_| set_collapsed.update(|v| *v = !*v)>
                    {move || if collapsed.get() { "»" } else { "«" }}
                </button>
            </div>

            <nav class="sidebar-nav">
                {Route::NAVIGATION.into_iter().map(|route| {
                    let is_active = move || ctx.route.get() == route;
                    view! {
                        <button
                            class=move || if is_active() { "nav-item active" } else { "nav-item" }
                            on:click=move |_| ctx.navigate(route)
                        >
                            <span class="nav-label">{route.label()}</span>
                        </button>
                    }
                }).collect_view()}
            </nav>

            <div class="sidebar-footer">
                <span class="sidebar-user">{display_name}</span>
                <button class="logout-btn" on:click=move |_| ctx.sign_out()>"Logout"</button>
                <ActivityLog />
            </div>
        </aside>
    }
}

/// Recent log lines, for support requests
#[component]
fn ActivityLog() -> impl IntoView {
    let Some(logs) = use_context::<LogHandle>() else {
        return ().into_any();
    };
    let (lines, set_lines) = signal(Vec::<String>::new());

    view! {
        <details class="activity-log">
            <summary on:click=move |_| set_lines.set(logs.recent_lines())>"Activity"</summary>
            <ul>
                {move || lines.get().into_iter().rev().take(50).map(|line| view! { <li>{line}</li> }).collect_view()}
            </ul>
        </details>
    }
    .into_any()
}

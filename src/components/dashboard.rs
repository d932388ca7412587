//! Dashboard Component
//!
//! Status cards, overall progress and the next few open tasks.

use leptos::prelude::*;
use study_sync::{DisplayStatus, Route, StatusCounts};

use crate::context::use_app_context;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

const UPCOMING_LIMIT: usize = 5;

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();

    let counts = Memo::new(move |_| StatusCounts::tally(store.tasks().read().iter()));
    let progress = move || {
        let counts = counts.get();
        match counts.total() {
            0 => 0,
            total => counts.completed * 100 / total,
        }
    };
    let greeting = move || {
        store
            .user()
            .read()
            .as_ref()
            .map(|u| format!("Hello, {}", u.display_name()))
            .unwrap_or_default()
    };
    let upcoming = move || {
        store
            .tasks()
            .read()
            .iter()
            .filter(|t| t.display_status() != DisplayStatus::Completed)
            .take(UPCOMING_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
    };

    view! {
        <section class="dashboard">
            <h1>{greeting}</h1>

            <Show
                when=move || store.tasks_loaded().get()
                fallback=|| view! { <p class="loading">"Loading tasks..."</p> }
            >
                <div class="status-cards">
                    {DisplayStatus::ALL.into_iter().map(|status| view! {
                        <div class=format!("status-card status-{}", status.as_str())>
                            <p class="status-card-label">{status.label()}</p>
                            <p class="status-card-count">{move || counts.get().get(status)}</p>
                        </div>
                    }).collect_view()}
                </div>

                <div class="progress">
                    <div class="progress-bar" style=move || format!("width: {}%;", progress())></div>
                    <span class="progress-text">{move || format!("{}% complete", progress())}</span>
                </div>

                <h2>"Up next"</h2>
                <ul class="upcoming-list">
                    <For
                        each=upcoming
                        key=|task| task.id.clone()
                        children=move |task| view! {
                            <li class="upcoming-item">
                                <span class="upcoming-name">{task.name.clone()}</span>
                                <span class="upcoming-subject">{task.subject.clone()}</span>
                                <span class=format!("status-pill status-{}", task.display_status().as_str())>
                                    {task.display_status().label()}
                                </span>
                            </li>
                        }
                    />
                </ul>
            </Show>

            <div class="dashboard-links">
                <button on:click=move |_| ctx.navigate(Route::Tasks)>"Open task board"</button>
                <button on:click=move |_| ctx.navigate(Route::Materials)>
                    {move || format!("Study materials ({})", store.materials().read().len())}
                </button>
                <button on:click=move |_| ctx.navigate(Route::Assistant)>"Ask the assistant"</button>
            </div>
        </section>
    }
}

//! Study Dashboard App
//!
//! Root component: wires the list controllers into the store, restores the
//! session and renders the page for the current route.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use rolling_logger::LogHandle;
use study_sync::{ApiConfig, GateDecision, Route};
use wasm_bindgen::JsCast;

use crate::components::{
    AssistantPanel, Dashboard, KanbanBoard, LoginForm, MaterialsPanel, NoticeBar, RegisterForm, Sidebar,
};
use crate::context::AppContext;
use crate::store::{store_set_materials, store_set_tasks, DashboardState, DashboardStateStoreFields};

#[component]
pub fn App(config: ApiConfig, logs: Option<LogHandle>) -> impl IntoView {
    let store = Store::new(DashboardState::default());
    provide_context(store);
    let ctx = AppContext::new(config, store);
    provide_context(ctx);
    if let Some(logs) = logs {
        provide_context(logs);
    }

    // Controllers own the lists; the store mirrors every change
    ctx.tasks().subscribe(move |rows, pending| store_set_tasks(&store, rows, pending));
    ctx.materials().subscribe(move |rows, pending| store_set_materials(&store, rows, pending));

    ctx.restore_session();

    // Browser back/forward
    if let Some(win) = web_sys::window() {
        let on_popstate = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || ctx.follow_location());
        let _ = win.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        on_popstate.forget();
    }

    // Load both lists whenever a user signs in
    Effect::new(move |_| {
        let Some(user_id) = store.user().read().as_ref().map(|u| u.id.clone()) else {
            return;
        };
        tracing::info!(user = %user_id, "loading dashboard data");
        spawn_local(async move {
            if let Err(e) = ctx.tasks().refresh().await {
                ctx.notify_error(&e);
            }
            *store.tasks_loaded().write() = true;
        });
        spawn_local(async move {
            if let Err(e) = ctx.materials().refresh().await {
                ctx.notify_error(&e);
            }
            *store.materials_loaded().write() = true;
        });
    });

    view! {
        {move || match ctx.route.get() {
            Route::Login => view! { <LoginForm /> }.into_any(),
            Route::Register => view! { <RegisterForm /> }.into_any(),
            page => match ctx.require_session() {
                GateDecision::Render(_) => view! {
                    <div class="app-layout">
                        <Sidebar />
                        <main class="main-content">
                            <NoticeBar />
                            {page_view(page)}
                        </main>
                    </div>
                }.into_any(),
                GateDecision::Redirect(_) => view! { <LoginForm /> }.into_any(),
            },
        }}
    }
}

fn page_view(route: Route) -> AnyView {
    match route {
        Route::Tasks => view! { <KanbanBoard /> }.into_any(),
        Route::Materials => view! { <MaterialsPanel /> }.into_any(),
        Route::Assistant => view! { <AssistantPanel /> }.into_any(),
        _ => view! { <Dashboard /> }.into_any(),
    }
}

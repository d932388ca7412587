//! Board Export / Import
//!
//! Copies the board out as JSON, or takes pasted JSON and adds its tasks.

use leptos::prelude::*;
use leptos::task::spawn_local;
use study_sync::{export_board, import_tasks, parse_import, SyncError};

use crate::context::use_app_context;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn BoardTransfer(#[prop(into)] active_subject: Signal<Option<String>>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();

    let (open, set_open) = signal(false);
    let (text, set_text) = signal(String::new());
    let (importing, set_importing) = signal(false);

    let export = move |_| {
        let subject = active_subject.get_untracked();
        match store.tasks().with_untracked(|tasks| export_board(tasks, subject.as_deref())) {
            Ok(json) => {
                set_text.set(json);
                set_open.set(true);
            }
            Err(e) => ctx.notify_error(&e),
        }
    };

    let import = move |_| {
        let owner = match ctx.owner_id() {
            Ok(owner) => owner,
            Err(e) => return ctx.notify_error(&e),
        };
        let drafts = match parse_import(&text.get_untracked()) {
            Ok(drafts) => drafts,
            Err(e) => return ctx.notify_error(&e),
        };
        let drafts: Vec<_> = drafts.into_iter().map(|d| d.owned_by(owner.clone())).collect();

        set_importing.set(true);
        spawn_local(async move {
            let summary = import_tasks(&ctx.tasks(), drafts).await;
            set_importing.set(false);
            if summary.failed == 0 {
                set_text.set(String::new());
                set_open.set(false);
                ctx.notify_success(format!("Imported {} tasks", summary.added));
            } else {
                ctx.notify_error(&SyncError::validation(format!(
                    "Imported {} tasks, {} could not be added",
                    summary.added, summary.failed
                )));
            }
        });
    };

    view! {
        <div class="board-transfer">
            <button class="transfer-btn" on:click=export>"Export"</button>
            <button class="transfer-btn" on:click=move |_| set_open.update(|o| *o = !*o)>
                {move || if open.get() { "Close" } else { "Import" }}
            </button>
            <Show when=move || open.get()>
                <div class="transfer-panel">
                    <textarea
                        class="transfer-text"
                        rows="10"
                        placeholder="Paste exported JSON here"
                        prop:value=move || text.get()
                        on:input=move |ev| set_text.set(event_target_value(&ev))
                    />
                    <button
                        class="transfer-import"
                        disabled=move || importing.get() || text.with(|t| t.trim().is_empty())
                        on:click=import
                    >
                        {move || if importing.get() { "Importing..." } else { "Import tasks" }}
                    </button>
                </div>
            </Show>
        </div>
    }
}

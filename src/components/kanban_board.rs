//! Kanban Board Component
//!
//! Three status columns with search, status and subject filters. Dropping
//! a card on another column changes its status through the task list
//! controller; dropping it back on its own column does nothing. The last
//! move or delete can be undone for a few seconds.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{create_dnd_signals, make_on_dragleave, make_on_dragover, make_on_drop, DndSignals};
use study_sync::{
    DisplayStatus, DragDropReorder, DropOutcome, StatusCounts, Task, TaskFilter, UndoAction, UndoHistory,
    UNDO_WINDOW_MS,
};

use crate::components::{BoardTransfer, NewTaskForm, SubjectTabs, TaskCard};
use crate::context::use_app_context;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn KanbanBoard() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();

    let (search, set_search) = signal(String::new());
    let (status_filter, set_status_filter) = signal(None::<DisplayStatus>);
    let (subject, set_subject) = signal(None::<String>);

    let dnd: DndSignals<String, DisplayStatus> = create_dnd_signals();
    let drag = StoredValue::new(DragDropReorder::new());

    let filter = Memo::new(move |_| TaskFilter {
        search: search.get(),
        status: status_filter.get(),
        subject: subject.get(),
    });
    let counts = Memo::new(move |_| StatusCounts::tally(store.tasks().read().iter()));

    let (undo, set_undo) = signal(UndoHistory::default());
    let offer_undo = Callback::new(move |action: UndoAction| {
        let Some(ticket) = set_undo.try_update(|h| h.record(action)) else {
            return;
        };
        spawn_local(async move {
            TimeoutFuture::new(UNDO_WINDOW_MS).await;
            let _ = set_undo.try_update(|h| h.expire(ticket));
        });
    });
    let run_undo = move |_| {
        let Some(action) = set_undo.try_update(|h| h.take()).flatten() else {
            return;
        };
        spawn_local(async move {
            match action.revert(&ctx.tasks()).await {
                Ok(_) => ctx.notify_success("Change undone"),
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    let on_drag_start = Callback::new(move |task: Task| drag.update_value(|d| d.begin(&task)));
    let on_drag_cancel = Callback::new(move |_: ()| drag.update_value(|d| d.cancel()));
    let on_drop = Callback::new(move |(_, column): (String, DisplayStatus)| {
        let outcome = drag.try_update_value(|d| d.drop_on(column)).unwrap_or(DropOutcome::Ignored);
        if !matches!(outcome, DropOutcome::Move { .. }) {
            return;
        }
        spawn_local(async move {
            match outcome.send(&ctx.tasks()).await {
                Ok(Some(action)) => offer_undo.run(action),
                Ok(None) => {}
                Err(e) => ctx.notify_error(&e),
            }
        });
    });

    view! {
        <section class="kanban">
            <h1>"Tasks"</h1>
            <NewTaskForm />

            <div class="kanban-filters">
                <input
                    type="search"
                    placeholder="Search tasks..."
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    let status = DisplayStatus::ALL.into_iter().find(|s| s.as_str() == value);
                    set_status_filter.set(status);
                }>
                    <option value="">"All statuses"</option>
                    {DisplayStatus::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str()>{s.label()}</option>
                    }).collect_view()}
                </select>
            </div>
            <SubjectTabs selected=subject set_selected=set_subject />
            <BoardTransfer active_subject=subject />

            {move || undo.with(|h| h.current().map(UndoAction::label)).map(|label| view! {
                <div class="undo-bar" role="status">
                    <span class="undo-text">{label}</span>
                    <button class="undo-btn" on:click=run_undo>"Undo"</button>
                </div>
            })}

            <Show
                when=move || store.tasks_loaded().get()
                fallback=|| view! { <p class="loading">"Loading tasks..."</p> }
            >
                <div class="kanban-columns">
                    {DisplayStatus::ALL.into_iter().map(|column| {
                        let cards = move || {
                            let filter = filter.get();
                            store
                                .tasks()
                                .read()
                                .iter()
                                .filter(|t| t.display_status() == column && filter.matches(t))
                                .cloned()
                                .collect::<Vec<_>>()
                        };
                        view! {
                            <div
                                class=move || {
                                    let mut c = format!("kanban-column column-{}", column.as_str());
                                    if dnd.is_over(column) { c.push_str(" drop-target"); }
                                    c
                                }
                                on:dragover=make_on_dragover(dnd, column)
                                on:dragleave=make_on_dragleave(dnd, column)
                                on:drop=make_on_drop(dnd, column, on_drop)
                            >
                                <div class="kanban-column-header">
                                    <h2>{column.label()}</h2>
                                    <span class="kanban-count">{move || counts.get().get(column)}</span>
                                </div>
                                <div class="kanban-cards">
                                    <For
                                        each=cards
                                        key=|t| (t.id.clone(), t.name.clone(), t.description.clone(), t.subject.clone(), t.status)
                                        children=move |task| view! {
                                            <TaskCard
                                                task=task
                                                dnd=dnd
                                                on_drag_start=on_drag_start
                                                on_drag_cancel=on_drag_cancel
                                                on_undoable=offer_undo
                                            />
                                        }
                                    />
                                </div>
                            </div>
                        }
                    }).collect_view()}
                </div>
            </Show>
        </section>
    }
}

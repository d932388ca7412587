//! Task Card Component
//!
//! One draggable card on the board. Arrow keys step the status, Enter
//! cycles it, Delete removes the card.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_dragend, make_on_dragstart, DndSignals};
use study_sync::{DisplayStatus, StatusMapper, Task, TaskPatch, UndoAction};

use crate::components::DeleteConfirmButton;
use crate::context::{use_app_context, AppContext};
use crate::store::{store_task_pending, use_dashboard_store};

/// Send an edit; `undo` is offered once the server confirms it
fn send_patch(ctx: AppContext, id: String, patch: TaskPatch, undo: Option<(UndoAction, Callback<UndoAction>)>) {
    spawn_local(async move {
        match ctx.tasks().edit(&id, patch).await {
            Ok(_) => {
                if let Some((action, offer)) = undo {
                    offer.run(action);
                }
            }
            Err(e) => ctx.notify_error(&e),
        }
    });
}

fn delete_task(ctx: AppContext, task: Task, offer: Callback<UndoAction>) {
    spawn_local(async move {
        match ctx.tasks().remove(&task.id).await {
            Ok(()) => offer.run(UndoAction::deleted(task)),
            Err(e) => ctx.notify_error(&e),
        }
    });
}

#[component]
pub fn TaskCard(
    task: Task,
    dnd: DndSignals<String, DisplayStatus>,
    #[prop(into)] on_drag_start: Callback<Task>,
    #[prop(into)] on_drag_cancel: Callback<()>,
    #[prop(into)] on_undoable: Callback<UndoAction>,
) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();

    let id = task.id.clone();
    let status = task.display_status();
    let is_pending = {
        let id = id.clone();
        Signal::derive(move || store_task_pending(&store, &id))
    };
    let (editing, set_editing) = signal(false);
    let (draft_name, set_draft_name) = signal(task.name.clone());
    let (draft_description, set_draft_description) = signal(task.description.clone().unwrap_or_default());

    let start_drag = make_on_dragstart(dnd, id.clone());
    let on_dragstart = {
        let task = task.clone();
        move |ev: web_sys::DragEvent| {
            start_drag(ev);
            on_drag_start.run(task.clone());
        }
    };
    let on_dragend = make_on_dragend(dnd, Some(on_drag_cancel));

    let on_keydown = {
        let task = task.clone();
        move |ev: web_sys::KeyboardEvent| {
            if editing.get_untracked() || is_pending.get_untracked() {
                return;
            }
            let next = match ev.key().as_str() {
                "ArrowRight" => status.next(),
                "ArrowLeft" => status.previous(),
                "Enter" => status.cycle(),
                "Delete" => {
                    ev.prevent_default();
                    return delete_task(ctx, task.clone(), on_undoable);
                }
                _ => return,
            };
            ev.prevent_default();
            if next != status {
                let undo = (UndoAction::moved(&task), on_undoable);
                send_patch(ctx, task.id.clone(), TaskPatch::status(StatusMapper::to_api(next)), Some(undo));
            }
        }
    };

    let save_edit = {
        let id = id.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let patch = TaskPatch::rename(draft_name.get()).with_description(draft_description.get());
            set_editing.set(false);
            send_patch(ctx, id.clone(), patch, None);
        }
    };

    let on_delete = {
        let task = task.clone();
        move |_| delete_task(ctx, task.clone(), on_undoable)
    };

    let created = task.created_at.map(|at| at.format("%b %e, %Y").to_string());
    let description = task.description.clone();

    view! {
        <div
            class=move || if is_pending.get() { "task-card pending" } else { "task-card" }
            draggable="true"
            tabindex="0"
            title="Drag, or use ←/→ to move between columns"
            on:dragstart=on_dragstart
            on:dragend=on_dragend
            on:keydown=on_keydown
        >
            <Show
                when=move || editing.get()
                fallback={
                    let name = task.name.clone();
                    let subject = task.subject.clone();
                    move || view! {
                        <div class="task-card-header">
                            <h3 class="task-name">{name.clone()}</h3>
                            <div class="task-actions">
                                <button
                                    class="edit-btn"
                                    title="Edit"
                                    on:click=move |_| {
                                        if !dnd.drag_just_ended_read.get_untracked() {
                                            set_editing.set(true);
                                        }
                                    }
                                >
                                    "✎"
                                </button>
                            </div>
                        </div>
                        {description.clone().map(|d| view! { <p class="task-description">{d}</p> })}
                        <div class="task-meta">
                            <span class="task-subject">{subject.clone()}</span>
                            {created.clone().map(|c| view! { <span class="task-date">{c}</span> })}
                        </div>
                    }
                }
            >
                <form class="task-edit-form" on:submit=save_edit.clone()>
                    <input
                        type="text"
                        prop:value=move || draft_name.get()
                        on:input=move |ev| set_draft_name.set(event_target_value(&ev))
                    />
                    <textarea
                        prop:value=move || draft_description.get()
                        on:input=move |ev| set_draft_description.set(event_target_value(&ev))
                    />
                    <div class="task-edit-actions">
                        <button type="submit">"Save"</button>
                        <button type="button" on:click=move |_| set_editing.set(false)>"Cancel"</button>
                    </div>
                </form>
            </Show>
            <DeleteConfirmButton button_class="delete-btn" disabled=is_pending prompt="Delete task" on_confirm=on_delete />
        </div>
    }
}

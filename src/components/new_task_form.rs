//! New Task Form Component
//!
//! Adds a task to the board; the card shows up before the server answers.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use study_sync::{DisplayStatus, Entity, StatusMapper, Task, TaskDraft};

use crate::context::use_app_context;

#[component]
pub fn NewTaskForm() -> impl IntoView {
    let ctx = use_app_context();

    let (name, set_name) = signal(String::new());
    let (subject, set_subject) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (status, set_status) = signal(DisplayStatus::Pending);

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let owner = match ctx.owner_id() {
            Ok(owner) => owner,
            Err(e) => return ctx.notify_error(&e),
        };
        let draft = TaskDraft::new(name.get(), subject.get())
            .with_description(description.get())
            .with_status(StatusMapper::to_api(status.get()))
            .owned_by(owner);
        if let Err(e) = Task::validate_draft(&draft) {
            return ctx.notify_error(&e);
        }

        // Clear right away; the optimistic card already shows what was typed
        set_name.set(String::new());
        set_description.set(String::new());

        spawn_local(async move {
            match ctx.tasks().add(draft).await {
                Ok(task) => ctx.notify_success(format!("Added \"{}\"", task.name)),
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <div class="new-task-row">
                <input
                    type="text"
                    placeholder="Task name"
                    prop:value=move || name.get()
                    on:input=move |ev| {
                        let target = ev.target().unwrap();
                        let input = target.dyn_ref::<web_sys::HtmlInputElement>().unwrap();
                        set_name.set(input.value());
                    }
                />
                <input
                    type="text"
                    placeholder="Subject"
                    prop:value=move || subject.get()
                    on:input=move |ev| set_subject.set(event_target_value(&ev))
                />
                <select
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        set_status.set(StatusMapper::to_display(&value));
                    }
                >
                    {DisplayStatus::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str() selected=move || status.get() == s>{s.label()}</option>
                    }).collect_view()}
                </select>
                <button type="submit">"Add"</button>
            </div>
            <textarea
                class="new-task-description"
                placeholder="Description (optional)"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
        </form>
    }
}

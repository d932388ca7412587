//! Subject Tab Bar Component
//!
//! "All" plus one tab per subject seen on the board.

use leptos::prelude::*;
use study_sync::subjects;

use crate::store::{use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn SubjectTabs(
    selected: ReadSignal<Option<String>>,
    set_selected: WriteSignal<Option<String>>,
) -> impl IntoView {
    let store = use_dashboard_store();
    let all_subjects = Memo::new(move |_| subjects(&store.tasks().read()));

    view! {
        <div class="subject-tabs">
            <button
                class=move || if selected.get().is_none() { "subject-tab active" } else { "subject-tab" }
                on:click=move |_| set_selected.set(None)
            >
                "All"
            </button>
            <For
                each=move || all_subjects.get()
                key=|subject| subject.clone()
                children=move |subject| {
                    let value = subject.clone();
                    let is_active = {
                        let subject = subject.clone();
                        move || selected.with(|s| s.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(&subject)))
                    };
                    view! {
                        <button
                            class=move || if is_active() { "subject-tab active" } else { "subject-tab" }
                            on:click=move |_| set_selected.set(Some(value.clone()))
                        >
                            {subject}
                        </button>
                    }
                }
            />
        </div>
    }
}

//! Delete Confirm Button
//!
//! Two-step delete: the first click arms the button, the second deletes.
//! An armed button disarms itself after a few seconds, on Escape, or when
//! the entry it belongs to gets a call in flight.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const ARMED_FOR_MS: u32 = 4_000;

#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    /// Entry has a call in flight
    #[prop(into, optional)]
    disabled: Signal<bool>,
    #[prop(into, optional)] prompt: Option<String>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let prompt = prompt.unwrap_or_else(|| "Delete?".to_string());
    // Bumped on every arm so a stale timer leaves a newer arm alone
    let (armed, set_armed) = signal(None::<u32>);
    let arms = StoredValue::new(0u32);

    let disarm = move || set_armed.set(None);
    let arm = move || {
        arms.update_value(|n| *n += 1);
        let ticket = arms.get_value();
        set_armed.set(Some(ticket));
        spawn_local(async move {
            TimeoutFuture::new(ARMED_FOR_MS).await;
            set_armed.try_update(|a| {
                if *a == Some(ticket) {
                    *a = None;
                }
            });
        });
    };

    Effect::new(move |_| {
        if disabled.get() {
            disarm();
        }
    });

    view! {
        <Show
            when=move || armed.get().is_some()
            fallback=move || view! {
                <button
                    class=button_class.clone()
                    title="Delete"
                    disabled=move || disabled.get()
                    on:click=move |ev| {
                        ev.stop_propagation();
                        arm();
                    }
                >
                    "×"
                </button>
            }
        >
            <span
                class="delete-confirm"
                on:keydown=move |ev| {
                    if ev.key() == "Escape" {
                        ev.stop_propagation();
                        disarm();
                    }
                }
            >
                <button
                    class="confirm-btn"
                    autofocus=true
                    on:click=move |ev| {
                        ev.stop_propagation();
                        disarm();
                        on_confirm.run(());
                    }
                >
                    {prompt.clone()}
                </button>
                <button
                    class="cancel-btn"
                    title="Keep"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        disarm();
                    }
                >
                    "Cancel"
                </button>
            </span>
        </Show>
    }
}

//! Sign-in and registration forms

use leptos::prelude::*;
use leptos::task::spawn_local;
use study_sync::{Credentials, Registration, Route, SyncError};

use crate::context::{use_app_context, AppContext};

/// Text input bound to a signal
#[component]
fn Field(
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <label class="auth-field">
            <span>{label}</span>
            <input
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

fn finish_auth(ctx: AppContext, result: Result<study_sync::User, SyncError>, set_error: WriteSignal<Option<String>>) {
    match result.and_then(|user| ctx.sign_in(user)) {
        Ok(()) => ctx.notify_success("Signed in"),
        Err(e) => {
            tracing::warn!(error = %e, "authentication failed");
            set_error.set(Some(e.to_string()));
        }
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let credentials = Credentials { email: email.get_untracked(), password: password.get_untracked() };
        set_error.set(None);
        set_busy.set(true);
        spawn_local(async move {
            let result = ctx.auth().login(&credentials).await;
            set_busy.set(false);
            finish_auth(ctx, result, set_error);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Welcome back"</h1>
                <Field label="Email" kind="email" value=email />
                <Field label="Password" kind="password" value=password />
                {move || error.get().map(|e| view! { <p class="auth-error">{e}</p> })}
                <button type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
                <p class="auth-switch">
                    "No account yet? "
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Route::Register);
                    }>"Register"</a>
                </p>
            </form>
        </div>
    }
}

#[component]
pub fn RegisterForm() -> impl IntoView {
    let ctx = use_app_context();
    let name = RwSignal::new(String::new());
    let student_id = RwSignal::new(String::new());
    let department = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = Registration {
            name: name.get_untracked(),
            student_id: student_id.get_untracked(),
            department: department.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };
        set_error.set(None);
        set_busy.set(true);
        spawn_local(async move {
            let result = ctx.auth().register(&form).await;
            set_busy.set(false);
            finish_auth(ctx, result, set_error);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Create your account"</h1>
                <Field label="Full name" value=name />
                <Field label="Student / Employee ID" value=student_id />
                <Field label="Department" value=department />
                <Field label="Email" kind="email" value=email />
                <Field label="Password" kind="password" value=password />
                <Field label="Confirm password" kind="password" value=confirm_password />
                {move || error.get().map(|e| view! { <p class="auth-error">{e}</p> })}
                <button type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Creating account..." } else { "Register" }}
                </button>
                <p class="auth-switch">
                    "Already registered? "
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(Route::Login);
                    }>"Sign in"</a>
                </p>
            </form>
        </div>
    }
}

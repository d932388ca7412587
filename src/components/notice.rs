//! Notice Bar Component
//!
//! Success and error messages that dismiss themselves.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_app_context, NoticeKind};

#[component]
pub fn NoticeBar() -> impl IntoView {
    let ctx = use_app_context();
    let delay = ctx.config().notice_ms;

    // Each new notice schedules its own dismissal; a newer one survives it
    Effect::new(move |_| {
        if let Some(id) = ctx.notice.with(|n| n.as_ref().map(|n| n.id)) {
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                ctx.clear_notice(id);
            });
        }
    });

    view! {
        {move || ctx.notice.get().map(|notice| {
            let class = match notice.kind {
                NoticeKind::Success => "notice notice-success",
                NoticeKind::Error => "notice notice-error",
            };
            let id = notice.id;
            view! {
                <div class=class role="status">
                    <span class="notice-text">{notice.text}</span>
                    <button class="notice-close" on:click=move |_| ctx.clear_notice(id)>"×"</button>
                </div>
            }
        })}
    }
}

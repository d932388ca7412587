//! AI Study Assistant Panel
//!
//! Ask a question, optionally with a document attached, and keep the
//! answers from this visit on screen.

use leptos::prelude::*;
use leptos::task::spawn_local;
use study_sync::Attachment;

use crate::context::use_app_context;
use crate::services::read_selected_file;

#[derive(Debug, Clone, PartialEq)]
struct Exchange {
    id: usize,
    question: String,
    attachment: Option<String>,
    answer: Result<String, String>,
}

#[component]
pub fn AssistantPanel() -> impl IntoView {
    let ctx = use_app_context();

    let (question, set_question) = signal(String::new());
    let (attachment, set_attachment) = signal(None::<Attachment>);
    let (thinking, set_thinking) = signal(false);
    let (history, set_history) = signal(Vec::<Exchange>::new());
    let (file_error, set_file_error) = signal(None::<String>);

    let on_file = move |ev: web_sys::Event| {
        spawn_local(async move {
            match read_selected_file(&ev).await {
                Ok(file) => {
                    set_file_error.set(None);
                    set_attachment.set(file);
                }
                Err(e) => {
                    set_attachment.set(None);
                    set_file_error.set(Some(e.to_string()));
                }
            }
        });
    };

    let ask = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if thinking.get_untracked() {
            return;
        }
        let asked = question.get_untracked();
        let file = attachment.get_untracked();
        let file_name = file.as_ref().map(|f| f.filename.clone());

        set_thinking.set(true);
        spawn_local(async move {
            let answer = ctx.assistant().ask(&asked, file).await.map_err(|e| e.to_string());
            if answer.is_ok() {
                set_question.set(String::new());
                set_attachment.set(None);
            }
            set_history.update(|h| {
                let id = h.len();
                h.push(Exchange { id, question: asked, attachment: file_name, answer });
            });
            set_thinking.set(false);
        });
    };

    view! {
        <section class="assistant">
            <h1>"AI Study Assistant"</h1>
            <div class="assistant-history">
                <For
                    each=move || history.get().into_iter().rev()
                    key=|x| x.id
                    children=|x| view! {
                        <article class="exchange">
                            <p class="exchange-question">
                                {x.question.clone()}
                                {x.attachment.clone().map(|name| view! { <span class="exchange-file">{name}</span> })}
                            </p>
                            {match x.answer.clone() {
                                Ok(text) => view! { <div class="exchange-answer">{text}</div> }.into_any(),
                                Err(text) => view! { <div class="exchange-answer error">{text}</div> }.into_any(),
                            }}
                        </article>
                    }
                />
            </div>
            <form class="assistant-form" on:submit=ask>
                <textarea
                    placeholder="Ask a question about your studies..."
                    prop:value=move || question.get()
                    on:input=move |ev| set_question.set(event_target_value(&ev))
                />
                <label class="file-input">
                    <input type="file" accept=".pdf,.doc,.docx,.txt" on:change=on_file />
                    <span>
                        {move || attachment.with(|a| a.as_ref().map(|f| f.filename.clone()))
                            .unwrap_or_else(|| "Attach a file (optional)".to_string())}
                    </span>
                </label>
                {move || file_error.get().map(|e| view! { <p class="form-error">{e}</p> })}
                <button type="submit" disabled=move || thinking.get()>
                    {move || if thinking.get() { "Thinking..." } else { "Ask" }}
                </button>
            </form>
        </section>
    }
}

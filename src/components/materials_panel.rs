//! Study Materials Panel
//!
//! Searchable list of materials with an add form that takes either an
//! uploaded document or a web link.

use leptos::prelude::*;
use leptos::task::spawn_local;
use study_sync::{Attachment, Entity, MaterialDraft, MaterialFilter, MaterialPatch, MaterialPayload, StudyMaterial};

use crate::components::DeleteConfirmButton;
use crate::context::{use_app_context, AppContext};
use crate::services::read_selected_file;
use crate::store::{store_material_pending, use_dashboard_store, DashboardStateStoreFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Keep,
    Document,
    Link,
}

/// The payload the form asks for, or `None` to leave it unchanged
fn chosen_payload(source: Source, document: Option<Attachment>, link: &str) -> Option<MaterialPayload> {
    match source {
        Source::Keep => None,
        Source::Document => Some(match document {
            Some(file) => MaterialPayload::document(file.filename, file.bytes),
            None => MaterialPayload::None,
        }),
        Source::Link if link.trim().is_empty() => Some(MaterialPayload::None),
        Source::Link => Some(MaterialPayload::link(link.trim())),
    }
}

fn file_picked(ev: web_sys::Event, set_document: WriteSignal<Option<Attachment>>, set_error: WriteSignal<Option<String>>) {
    spawn_local(async move {
        match read_selected_file(&ev).await {
            Ok(file) => {
                set_error.set(None);
                set_document.set(file);
            }
            Err(e) => {
                set_document.set(None);
                set_error.set(Some(e.to_string()));
            }
        }
    });
}

#[component]
pub fn MaterialsPanel() -> impl IntoView {
    let store = use_dashboard_store();
    let (search, set_search) = signal(String::new());

    let visible = move || {
        let filter = MaterialFilter { search: search.get() };
        store
            .materials()
            .read()
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect::<Vec<_>>()
    };

    view! {
        <section class="materials">
            <h1>"Study Materials"</h1>
            <NewMaterialForm />
            <input
                class="materials-search"
                type="search"
                placeholder="Search materials..."
                prop:value=move || search.get()
                on:input=move |ev| set_search.set(event_target_value(&ev))
            />
            <Show
                when=move || store.materials_loaded().get()
                fallback=|| view! { <p class="loading">"Loading materials..."</p> }
            >
                <Show
                    when=move || !store.materials().read().is_empty()
                    fallback=|| view! { <p class="empty">"No study materials yet."</p> }
                >
                    <div class="materials-grid">
                        <For
                            each=visible
                            key=|m| (m.id.clone(), m.name.clone(), m.description.clone(), m.payload.href().map(str::to_string))
                            children=move |material| view! { <MaterialCard material=material /> }
                        />
                    </div>
                </Show>
            </Show>
        </section>
    }
}

#[component]
fn NewMaterialForm() -> impl IntoView {
    let ctx = use_app_context();

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (source, set_source) = signal(Source::Document);
    let (link, set_link) = signal(String::new());
    let (document, set_document) = signal(None::<Attachment>);
    let (error, set_error) = signal(None::<String>);

    let on_file = move |ev: web_sys::Event| file_picked(ev, set_document, set_error);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let owner = match ctx.owner_id() {
            Ok(owner) => owner,
            Err(e) => return ctx.notify_error(&e),
        };
        let payload = chosen_payload(source.get(), document.get(), &link.get()).unwrap_or(MaterialPayload::None);
        let draft = MaterialDraft::new(name.get(), description.get()).owned_by(owner).with_payload(payload);
        if let Err(e) = StudyMaterial::validate_draft(&draft) {
            set_error.set(Some(e.to_string()));
            return;
        }

        set_error.set(None);
        set_name.set(String::new());
        set_description.set(String::new());
        set_link.set(String::new());
        set_document.set(None);

        spawn_local(async move {
            match ctx.materials().add(draft).await {
                Ok(created) => ctx.notify_success(format!("Added \"{}\"", created.name)),
                Err(e) => ctx.notify_error(&e),
            }
        });
    };

    view! {
        <form class="material-form" on:submit=submit>
            <input
                type="text"
                placeholder="Material name"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <div class="source-toggle">
                <button
                    type="button"
                    class=move || if source.get() == Source::Document { "source-btn active" } else { "source-btn" }
                    on:click=move |_| set_source.set(Source::Document)
                >
                    "Upload document"
                </button>
                <button
                    type="button"
                    class=move || if source.get() == Source::Link { "source-btn active" } else { "source-btn" }
                    on:click=move |_| set_source.set(Source::Link)
                >
                    "Web link"
                </button>
            </div>
            {move || match source.get() {
                Source::Document | Source::Keep => view! {
                    <label class="file-input">
                        <input type="file" accept=".pdf,.doc,.docx" on:change=on_file />
                        <span>
                            {move || document.with(|d| d.as_ref().map(|f| f.filename.clone()))
                                .unwrap_or_else(|| "PDF, DOC or DOCX up to 10MB".to_string())}
                        </span>
                    </label>
                }.into_any(),
                Source::Link => view! {
                    <input
                        type="url"
                        placeholder="https://..."
                        prop:value=move || link.get()
                        on:input=move |ev| set_link.set(event_target_value(&ev))
                    />
                }.into_any(),
            }}
            {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
            <button type="submit">"Add material"</button>
        </form>
    }
}

fn save_material(ctx: AppContext, id: String, patch: MaterialPatch) {
    spawn_local(async move {
        if let Err(e) = ctx.materials().edit(&id, patch).await {
            ctx.notify_error(&e);
        }
    });
}

#[component]
fn MaterialCard(material: StudyMaterial) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_dashboard_store();

    let id = material.id.clone();
    let is_pending = {
        let id = id.clone();
        Signal::derive(move || store_material_pending(&store, &id))
    };
    let (editing, set_editing) = signal(false);
    let (draft_name, set_draft_name) = signal(material.name.clone());
    let (draft_description, set_draft_description) = signal(material.description.clone());
    let (draft_source, set_draft_source) = signal(Source::Keep);
    let (draft_link, set_draft_link) = signal(match &material.payload {
        MaterialPayload::Link { url } => url.clone(),
        _ => String::new(),
    });
    let (draft_document, set_draft_document) = signal(None::<Attachment>);
    let (edit_error, set_edit_error) = signal(None::<String>);

    let open_url = material.payload.href().map(|href| ctx.config().asset_url(href));
    let kind = material.payload.kind_label();

    let save = {
        let id = id.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let patch = MaterialPatch {
                name: Some(draft_name.get()),
                description: Some(draft_description.get()),
                payload: chosen_payload(draft_source.get(), draft_document.get(), &draft_link.get()),
            };
            if let Err(e) = StudyMaterial::validate_patch(&patch) {
                set_edit_error.set(Some(e.to_string()));
                return;
            }
            set_edit_error.set(None);
            set_draft_source.set(Source::Keep);
            set_draft_document.set(None);
            set_editing.set(false);
            save_material(ctx, id.clone(), patch);
        }
    };

    let on_delete = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            spawn_local(async move {
                match ctx.materials().remove(&id).await {
                    Ok(()) => ctx.notify_success("Material deleted"),
                    Err(e) => ctx.notify_error(&e),
                }
            });
        }
    };

    view! {
        <article class=move || if is_pending.get() { "material-card pending" } else { "material-card" }>
            <Show
                when=move || editing.get()
                fallback={
                    let name = material.name.clone();
                    let description = material.description.clone();
                    let open_url = open_url.clone();
                    move || view! {
                        <header class="material-header">
                            <h3>{name.clone()}</h3>
                            <span class="material-kind">{kind}</span>
                        </header>
                        <p class="material-description">{description.clone()}</p>
                        <div class="material-actions">
                            {open_url.clone().map(|url| view! {
                                <a href=url target="_blank" rel="noopener noreferrer">"Open"</a>
                            })}
                            <button class="edit-btn" on:click=move |_| set_editing.set(true)>"Edit"</button>
                        </div>
                    }
                }
            >
                <form class="material-edit-form" on:submit=save.clone()>
                    <input
                        type="text"
                        prop:value=move || draft_name.get()
                        on:input=move |ev| set_draft_name.set(event_target_value(&ev))
                    />
                    <textarea
                        prop:value=move || draft_description.get()
                        on:input=move |ev| set_draft_description.set(event_target_value(&ev))
                    />
                    <select
                        class="source-select"
                        on:change=move |ev| set_draft_source.set(match event_target_value(&ev).as_str() {
                            "document" => Source::Document,
                            "link" => Source::Link,
                            _ => Source::Keep,
                        })
                    >
                        <option value="keep" selected=move || draft_source.get() == Source::Keep>
                            {format!("Keep {}", kind.to_lowercase())}
                        </option>
                        <option value="document" selected=move || draft_source.get() == Source::Document>
                            "Replace with document"
                        </option>
                        <option value="link" selected=move || draft_source.get() == Source::Link>
                            "Use a web link"
                        </option>
                    </select>
                    {move || match draft_source.get() {
                        Source::Keep => ().into_any(),
                        Source::Document => view! {
                            <label class="file-input">
                                <input
                                    type="file"
                                    accept=".pdf,.doc,.docx"
                                    on:change=move |ev| file_picked(ev, set_draft_document, set_edit_error)
                                />
                                <span>
                                    {move || draft_document.with(|d| d.as_ref().map(|f| f.filename.clone()))
                                        .unwrap_or_else(|| "Choose a file".to_string())}
                                </span>
                            </label>
                        }.into_any(),
                        Source::Link => view! {
                            <input
                                type="url"
                                placeholder="https://..."
                                prop:value=move || draft_link.get()
                                on:input=move |ev| set_draft_link.set(event_target_value(&ev))
                            />
                        }.into_any(),
                    }}
                    {move || edit_error.get().map(|e| view! { <p class="form-error">{e}</p> })}
                    <button type="submit">"Save"</button>
                    <button type="button" on:click=move |_| set_editing.set(false)>"Cancel"</button>
                </form>
            </Show>
            <DeleteConfirmButton button_class="delete-btn" disabled=is_pending prompt="Delete material" on_confirm=on_delete />
        </article>
    }
}

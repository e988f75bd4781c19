//! Notes list with its create / edit form.

use dioxus::prelude::*;
use store::{DraftSubmission, Note, NoteDraft, NoteId};

use crate::context::{use_note_store, use_notes};

#[component]
pub fn NotepadList() -> Element {
    let store = use_note_store();
    let state = use_notes();
    let mut draft = use_signal(NoteDraft::new);
    let mut form_error = use_signal(|| Option::<String>::None);

    // Load notes on mount
    let _loader = use_resource({
        let store = store.clone();
        move || {
            let store = store.clone();
            async move {
                if let Err(e) = store.fetch().await {
                    tracing::error!("Failed to load notes: {}", e);
                }
            }
        }
    });

    let handle_submit = {
        let store = store.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let submission = match draft.write().submit() {
                Ok(submission) => submission,
                Err(e) => {
                    form_error.set(Some(e.to_string()));
                    return;
                }
            };
            form_error.set(None);
            let store = store.clone();
            spawn(async move {
                let result = match submission {
                    DraftSubmission::Create(note) => store.create(note).await.map(|_| ()),
                    DraftSubmission::Update(id, patch) => store.update(&id, patch).await.map(|_| ()),
                };
                if let Err(e) = result {
                    tracing::error!("Failed to save note: {}", e);
                }
            });
        }
    };

    let current = draft();
    let snapshot = state();

    rsx! {
        div {
            class: "notepad",

            form {
                class: "note-form",
                onsubmit: handle_submit,

                input {
                    r#type: "text",
                    placeholder: "Title",
                    required: true,
                    value: current.title.clone(),
                    oninput: move |evt: FormEvent| draft.write().title = evt.value(),
                }
                textarea {
                    placeholder: "Content",
                    required: true,
                    value: current.content.clone(),
                    oninput: move |evt: FormEvent| draft.write().content = evt.value(),
                }
                if let Some(error) = form_error() {
                    div { class: "note-form-error", "{error}" }
                }
                div {
                    class: "form-actions",
                    button {
                        class: "primary",
                        r#type: "submit",
                        disabled: snapshot.loading,
                        if current.is_editing() { "Update Note" } else { "Add Note" }
                    }
                    if current.is_editing() {
                        button {
                            class: "secondary",
                            r#type: "button",
                            onclick: move |_| draft.write().cancel(),
                            "Cancel"
                        }
                    }
                }
            }

            if let Some(error) = snapshot.error.clone() {
                div { class: "notes-error", "Error: {error}" }
            }

            if snapshot.loading && snapshot.notes.is_empty() {
                div { class: "notes-loading", "Loading..." }
            }

            div {
                class: "notes-list",
                for note in snapshot.notes.iter().cloned() {
                    NoteCard {
                        key: "{note.id}",
                        note: note.clone(),
                        on_edit: move |note: Note| draft.write().edit(&note),
                        on_delete: {
                            let store = store.clone();
                            move |id: NoteId| {
                                let store = store.clone();
                                spawn(async move {
                                    if let Err(e) = store.delete(&id).await {
                                        tracing::error!("Failed to delete note: {}", e);
                                    }
                                });
                            }
                        },
                    }
                }
            }
        }

        style {
            r#"
            .notepad {{
                max-width: 720px;
                margin: 0 auto;
                padding: 2rem 1rem;
            }}

            .note-form {{
                display: flex;
                flex-direction: column;
                gap: 0.5rem;
                margin-bottom: 1.5rem;
            }}

            .note-form input, .note-form textarea {{
                padding: 0.5rem 0.75rem;
                border: 1px solid #e3e2e0;
                border-radius: 4px;
                font: inherit;
            }}

            .note-form textarea {{
                min-height: 6rem;
                resize: vertical;
            }}

            .notes-error, .note-form-error {{
                padding: 0.5rem 0.75rem;
                border-radius: 4px;
                background: #fdebec;
                color: #9f2f2d;
            }}

            .note-card {{
                padding: 1rem;
                border: 1px solid #e3e2e0;
                border-radius: 6px;
                margin-bottom: 0.75rem;
            }}

            .note-card p {{
                white-space: pre-wrap;
            }}
            "#
        }
    }
}

#[component]
fn NoteCard(note: Note, on_edit: EventHandler<Note>, on_delete: EventHandler<NoteId>) -> Element {
    let edit_target = note.clone();
    let delete_target = note.id.clone();

    rsx! {
        div {
            class: "note-card",
            h3 { "{note.title}" }
            p { "{note.content}" }
            div {
                class: "note-actions",
                button {
                    class: "secondary",
                    onclick: move |_| on_edit.call(edit_target.clone()),
                    "Edit"
                }
                button {
                    class: "danger",
                    onclick: move |_| on_delete.call(delete_target.clone()),
                    "Delete"
                }
            }
        }
    }
}

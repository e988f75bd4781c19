//! Application context: the note store, its mirrored state and the session.

use dioxus::prelude::*;
use store::{NoteStore, NotepadConfig, NotesState, RemoteClient, Session};

use crate::backend::{load_config, make_backend, Backend};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// True until the stored session has been checked.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            session: None,
            loading: false,
        }
    }
}

/// Get the current authentication state.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// The shared note store.
pub fn use_note_store() -> NoteStore<Backend> {
    use_context::<NoteStore<Backend>>()
}

/// Reactive copy of the note store's state, updated by its subscription.
pub fn use_notes() -> Signal<NotesState> {
    use_context::<Signal<NotesState>>()
}

pub fn use_config() -> NotepadConfig {
    use_context::<NotepadConfig>()
}

/// Provider component that owns the note store and the session.
/// Wrap your app with this component.
#[component]
pub fn NotepadProvider(children: Element) -> Element {
    let config = use_hook(load_config);
    let store = use_hook({
        let config = config.clone();
        move || NoteStore::new(make_backend(&config))
    });
    let mut auth_state = use_signal(AuthState::default);
    let notes_state = use_signal(NotesState::default);

    let subscription = use_hook({
        let store = store.clone();
        move || {
            store.subscribe(move |state| {
                let mut mirror = notes_state;
                mirror.set(state.clone());
            })
        }
    });
    use_drop({
        let store = store.clone();
        move || store.unsubscribe(subscription)
    });

    // Restore the stored session on mount
    let _ = use_resource({
        let store = store.clone();
        move || {
            let store = store.clone();
            async move {
                match store.client().current_session().await {
                    Ok(Some(session)) => auth_state.set(AuthState::signed_in(session)),
                    Ok(None) => auth_state.set(AuthState::signed_out()),
                    Err(e) => {
                        tracing::error!("Failed to restore session: {}", e);
                        auth_state.set(AuthState::signed_out());
                    }
                }
            }
        }
    });

    use_context_provider(|| config);
    use_context_provider(|| store);
    use_context_provider(|| notes_state);
    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button that signs the user out and clears their notes.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let store = use_note_store();
    let mut auth_state = use_auth();

    let onclick = move |_| {
        let store = store.clone();
        async move {
            match store.sign_out().await {
                Ok(()) => auth_state.set(AuthState::signed_out()),
                Err(e) => tracing::error!("Failed to sign out: {}", e),
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

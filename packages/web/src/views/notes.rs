use dioxus::prelude::*;
use ui::{use_auth, NotepadList, SignOutButton};

use crate::Route;

#[component]
pub fn Notes() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if !auth().loading && auth().session.is_none() {
            nav.replace(Route::Login {});
        }
    });

    let state = auth();
    if state.loading {
        return rsx! {
            div { class: "notes-loading", "Loading..." }
        };
    }
    let Some(session) = state.session else {
        return rsx! {};
    };
    let email = session.user.email.unwrap_or_default();

    rsx! {
        header {
            class: "notes-header",
            h1 { "Notepad" }
            div {
                class: "notes-user",
                span { "{email}" }
                SignOutButton { class: "secondary" }
            }
        }
        NotepadList {}
    }
}
